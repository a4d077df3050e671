// Rust guideline compliant 2026-02-23

//! Shared domain types for the premium-prediction pipeline.
//!
//! Defines the raw applicant input (`RawInput`, `FieldValue`), the fixed model
//! schema (`Column`, `FeatureVector`, `ONE_HOT_COLUMNS`), the age `Cohort`,
//! the error enums, and the two hexagonal ports `Regressor` and `Scaler`.
//! All pipeline crates depend on this crate; it depends on no workspace crate.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Applicants at or below this age are served by the "young" artifacts.
pub const DEFAULT_YOUNG_AGE_LIMIT: f64 = 25.0;

/// Column the scalers were fitted with but the models never see.
///
/// Present only transiently while a scaler runs; always pinned to zero.
pub const INCOME_LEVEL_COLUMN: &str = "income_level";

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// A single raw form value: either a number or a category label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Numeric widget value (all numeric form fields are integers in practice).
    Number(f64),
    /// Category label, e.g. `"Male"` or `"Diabetes & Thyroid"`.
    Label(String),
}

impl FieldValue {
    /// Return the numeric value of `field`.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NotNumeric`] when the value is a label.
    pub fn as_number(&self, field: &str) -> Result<f64, InputError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Label(label) => Err(InputError::NotNumeric {
                field: field.to_owned(),
                value: label.clone(),
            }),
        }
    }

    /// Return the label of `field`, rejecting numbers.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NotLabel`] when the value is a number.
    pub fn as_label(&self, field: &str) -> Result<&str, InputError> {
        match self {
            Self::Label(label) => Ok(label.as_str()),
            Self::Number(n) => Err(InputError::NotLabel {
                field: field.to_owned(),
                value: *n,
            }),
        }
    }

    /// String form used for category matching. Integral numbers drop the
    /// fractional part (`25.0` becomes `"25"`).
    #[must_use]
    pub fn to_label(&self) -> Cow<'_, str> {
        match self {
            Self::Label(label) => Cow::Borrowed(label.as_str()),
            Self::Number(n) => Cow::Owned(n.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_label())
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for FieldValue {
    fn from(label: &str) -> Self {
        Self::Label(label.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(label: String) -> Self {
        Self::Label(label)
    }
}

/// Mapping from form field name to raw value, as supplied by the form layer.
///
/// No field is required; the pipeline treats missing fields as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawInput {
    fields: BTreeMap<String, FieldValue>,
}

impl RawInput {
    /// Create an empty input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace the value of `field`.
    pub fn insert(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.fields.insert(field.to_owned(), value.into());
    }

    /// Remove `field`, returning its previous value.
    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    /// Value of `field`, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Number of fields present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` when no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(field, value)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for RawInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// One column of the model's expected input schema.
///
/// Variant order is schema order; `Column::ALL[c as usize] == c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Age,
    NumberOfDependants,
    IncomeLakhs,
    InsurancePlan,
    GeneticalRisk,
    NormalizedRiskScore,
    GenderMale,
    RegionNorthwest,
    RegionSoutheast,
    RegionSouthwest,
    MaritalStatusUnmarried,
    BmiCategoryObesity,
    BmiCategoryOverweight,
    BmiCategoryUnderweight,
    SmokingStatusOccasional,
    SmokingStatusRegular,
    EmploymentStatusSalaried,
    EmploymentStatusSelfEmployed,
}

/// Number of columns in the expected schema.
pub const COLUMN_COUNT: usize = 18;

impl Column {
    /// Every column, in schema order.
    pub const ALL: [Self; COLUMN_COUNT] = [
        Self::Age,
        Self::NumberOfDependants,
        Self::IncomeLakhs,
        Self::InsurancePlan,
        Self::GeneticalRisk,
        Self::NormalizedRiskScore,
        Self::GenderMale,
        Self::RegionNorthwest,
        Self::RegionSoutheast,
        Self::RegionSouthwest,
        Self::MaritalStatusUnmarried,
        Self::BmiCategoryObesity,
        Self::BmiCategoryOverweight,
        Self::BmiCategoryUnderweight,
        Self::SmokingStatusOccasional,
        Self::SmokingStatusRegular,
        Self::EmploymentStatusSalaried,
        Self::EmploymentStatusSelfEmployed,
    ];

    /// Column name exactly as the trained models know it.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::NumberOfDependants => "number_of_dependants",
            Self::IncomeLakhs => "income_lakhs",
            Self::InsurancePlan => "insurance_plan",
            Self::GeneticalRisk => "genetical_risk",
            Self::NormalizedRiskScore => "normalized_risk_score",
            Self::GenderMale => "gender_Male",
            Self::RegionNorthwest => "region_Northwest",
            Self::RegionSoutheast => "region_Southeast",
            Self::RegionSouthwest => "region_Southwest",
            Self::MaritalStatusUnmarried => "marital_status_Unmarried",
            Self::BmiCategoryObesity => "bmi_category_Obesity",
            Self::BmiCategoryOverweight => "bmi_category_Overweight",
            Self::BmiCategoryUnderweight => "bmi_category_Underweight",
            Self::SmokingStatusOccasional => "smoking_status_Occasional",
            Self::SmokingStatusRegular => "smoking_status_Regular",
            Self::EmploymentStatusSalaried => "employment_status_Salaried",
            Self::EmploymentStatusSelfEmployed => "employment_status_Self-Employed",
        }
    }

    /// Look a column up by its schema name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Position of this column in the schema.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the one-hot encoding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneHotColumn {
    /// Raw input field the indicator reads.
    pub field: &'static str,
    /// Label that switches the indicator on.
    pub value: &'static str,
    /// Output column.
    pub column: Column,
}

const fn one_hot(field: &'static str, value: &'static str, column: Column) -> OneHotColumn {
    OneHotColumn { field, value, column }
}

/// Every indicator column of the schema with the field/label it encodes.
///
/// Each nominal field has one reference label with no column of its own
/// (e.g. `Female`, `Northeast`, `Married`, `Normal`, `No Smoking`,
/// `Freelancer`); it encodes as all zeros.
pub static ONE_HOT_COLUMNS: [OneHotColumn; 12] = [
    one_hot("gender", "Male", Column::GenderMale),
    one_hot("region", "Northwest", Column::RegionNorthwest),
    one_hot("region", "Southeast", Column::RegionSoutheast),
    one_hot("region", "Southwest", Column::RegionSouthwest),
    one_hot("marital_status", "Unmarried", Column::MaritalStatusUnmarried),
    one_hot("bmi_category", "Obesity", Column::BmiCategoryObesity),
    one_hot("bmi_category", "Overweight", Column::BmiCategoryOverweight),
    one_hot("bmi_category", "Underweight", Column::BmiCategoryUnderweight),
    one_hot("smoking_status", "Occasional", Column::SmokingStatusOccasional),
    one_hot("smoking_status", "Regular", Column::SmokingStatusRegular),
    one_hot("employment_status", "Salaried", Column::EmploymentStatusSalaried),
    one_hot("employment_status", "Self-Employed", Column::EmploymentStatusSelfEmployed),
];

/// One model-ready row: a value for every schema column, in schema order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; COLUMN_COUNT],
}

impl FeatureVector {
    /// A vector with every column set to zero.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self { values: [0.0; COLUMN_COUNT] }
    }

    /// Value of the column called `name`, if the schema has one.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        Column::from_name(name).map(|c| self[c])
    }

    /// Values in schema order.
    #[must_use]
    pub const fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over `(column, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (Column, f64)> + '_ {
        Column::ALL.into_iter().zip(self.values.iter().copied())
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl Index<Column> for FeatureVector {
    type Output = f64;

    fn index(&self, column: Column) -> &f64 {
        &self.values[column.index()]
    }
}

impl IndexMut<Column> for FeatureVector {
    fn index_mut(&mut self, column: Column) -> &mut f64 {
        &mut self.values[column.index()]
    }
}

// ---------------------------------------------------------------------------
// Cohort
// ---------------------------------------------------------------------------

/// Which matched model/scaler pair serves an applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    /// Age at or below the young-age limit.
    Young,
    /// Everyone else.
    Rest,
}

impl Cohort {
    /// Select the cohort for `age`: `age <= young_age_limit` is `Young`.
    ///
    /// A NaN age compares false and lands in `Rest`.
    #[must_use]
    pub fn for_age(age: f64, young_age_limit: f64) -> Self {
        if age <= young_age_limit { Self::Young } else { Self::Rest }
    }

    /// Lower-case name, as used in artifact file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Young => "young",
            Self::Rest => "rest",
        }
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted premium, truncated toward zero.
    pub premium: i64,
    /// Cohort whose scaler and model produced the premium.
    pub cohort: Cohort,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Raw input carried a value of the wrong kind for its field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    /// A numeric field carried a label.
    #[error("field `{field}` must be numeric, got label {value:?}")]
    NotNumeric {
        /// Offending field.
        field: String,
        /// The label that was supplied.
        value: String,
    },
    /// A label-only field carried a number.
    #[error("field `{field}` must be a label, got number {value}")]
    NotLabel {
        /// Offending field.
        field: String,
        /// The number that was supplied.
        value: f64,
    },
}

/// Errors from the `Scaler` hexagonal port.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScalingError {
    /// The scaler names a column the scaling frame does not have.
    #[error("scaler column `{column}` is not in the feature schema")]
    MissingColumn {
        /// Unknown column name.
        column: String,
    },
    /// The slice handed to the transform does not match the fitted width.
    #[error("scaler fitted on {expected} columns, got {found}")]
    WidthMismatch {
        /// Number of fitted columns.
        expected: usize,
        /// Number of values supplied.
        found: usize,
    },
}

/// Errors from the `Regressor` hexagonal port.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// The model could not produce a value.
    #[error("prediction failed: {reason}")]
    PredictionFailed {
        /// Human-readable description.
        reason: String,
    },
    /// The model produced NaN or infinity.
    #[error("model produced a non-finite premium: {value}")]
    NonFinite {
        /// The offending value.
        value: f64,
    },
}

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Hexagonal port: a trained regression model.
///
/// Implemented by artifact adapters. The model dispatcher depends exclusively
/// on this trait -- never on a concrete model format.
pub trait Regressor {
    /// Predict a raw (untruncated) premium for one scaled feature row.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::PredictionFailed`] if the model cannot evaluate
    /// the row.
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError>;

    /// Short description of the model family (e.g. `"linear"`).
    fn name(&self) -> &str;
}

/// Hexagonal port: a fitted scaling transform plus the columns it was fitted on.
pub trait Scaler {
    /// Columns the transform applies to, in fitted order.
    ///
    /// May include [`INCOME_LEVEL_COLUMN`], which is not a schema column.
    fn columns(&self) -> &[String];

    /// Transform `values` in place; `values[i]` belongs to `columns()[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`ScalingError::WidthMismatch`] when `values.len()` differs
    /// from the fitted width.
    fn transform(&self, values: &mut [f64]) -> Result<(), ScalingError>;
}

impl<R: Regressor + ?Sized> Regressor for &R {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        (**self).predict(features)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<S: Scaler + ?Sized> Scaler for &S {
    fn columns(&self) -> &[String] {
        (**self).columns()
    }

    fn transform(&self, values: &mut [f64]) -> Result<(), ScalingError> {
        (**self).transform(values)
    }
}
