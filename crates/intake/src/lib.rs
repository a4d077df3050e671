// Rust guideline compliant 2026-02-23

//! Intake layer: what the applicant form may submit.
//!
//! Holds the field catalog (display order, numeric ranges, categorical
//! options), derives `income_level` from `income_lakhs`, validates values in
//! an [`ApplicationForm`], and generates random valid applicants with an
//! [`ApplicantGenerator`]. The prediction pipeline itself never validates;
//! this crate is the only place domains are enforced.
//!
//! Entry points: [`ApplicationForm::to_raw_input`], [`income_level_for`],
//! [`ApplicantGenerator::generate`]. Configuration via
//! [`GeneratorConfig::builder`].

mod generator;

pub use generator::{ApplicantGenerator, GeneratorConfig, GeneratorConfigBuilder};

use std::collections::BTreeMap;

use domain::{FieldValue, RawInput};

// ---------------------------------------------------------------------------
// Field catalog
// ---------------------------------------------------------------------------

/// Display order of the form fields; `income_lakhs` precedes the
/// `income_level` it drives.
pub const FIELD_ORDER: [&str; 13] = [
    "age",
    "number_of_dependants",
    "income_lakhs",
    "genetical_risk",
    "insurance_plan",
    "employment_status",
    "gender",
    "marital_status",
    "bmi_category",
    "smoking_status",
    "region",
    "medical_history",
    "income_level",
];

/// An integer form field with an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericField {
    /// Field name.
    pub name: &'static str,
    /// Smallest accepted value; also the widget default.
    pub min: u32,
    /// Largest accepted value.
    pub max: u32,
    /// Increment between accepted values.
    pub step: u32,
}

/// A single-choice form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoricalField {
    /// Field name.
    pub name: &'static str,
    /// Accepted labels; the first is the widget default.
    pub options: &'static [&'static str],
}

/// Numeric fields.
pub static NUMERIC_FIELDS: [NumericField; 4] = [
    NumericField { name: "age", min: 18, max: 100, step: 1 },
    NumericField { name: "income_lakhs", min: 0, max: 200, step: 1 },
    NumericField { name: "number_of_dependants", min: 0, max: 20, step: 1 },
    NumericField { name: "genetical_risk", min: 0, max: 5, step: 1 },
];

/// Categorical fields, options in display order.
pub static CATEGORICAL_FIELDS: [CategoricalField; 9] = [
    CategoricalField { name: "gender", options: &["Male", "Female"] },
    CategoricalField {
        name: "region",
        options: &["Northeast", "Northwest", "Southeast", "Southwest"],
    },
    CategoricalField { name: "marital_status", options: &["Unmarried", "Married"] },
    CategoricalField {
        name: "bmi_category",
        options: &["Overweight", "Underweight", "Normal", "Obesity"],
    },
    CategoricalField { name: "smoking_status", options: &["Regular", "No Smoking", "Occasional"] },
    CategoricalField {
        name: "employment_status",
        options: &["Self-Employed", "Freelancer", "Salaried"],
    },
    CategoricalField {
        name: "income_level",
        options: &[INCOME_OVER_40L, INCOME_UNDER_10L, INCOME_10L_25L, INCOME_25L_40L],
    },
    CategoricalField {
        name: "medical_history",
        options: &[
            "High blood pressure",
            "No Disease",
            "Diabetes & High blood pressure",
            "Diabetes & Heart disease",
            "Diabetes",
            "Diabetes & Thyroid",
            "Heart disease",
            "Thyroid",
            "High blood pressure & Heart disease",
        ],
    },
    CategoricalField { name: "insurance_plan", options: &["Silver", "Bronze", "Gold"] },
];

/// Field whose value is always derived, never entered.
pub const DERIVED_FIELD: &str = "income_level";

const INCOME_UNDER_10L: &str = "<10L";
const INCOME_10L_25L: &str = "10L - 25L";
const INCOME_25L_40L: &str = "25L - 40L";
const INCOME_OVER_40L: &str = "> 40L";

/// Look up a numeric field by name.
#[must_use]
pub fn numeric_field(name: &str) -> Option<&'static NumericField> {
    NUMERIC_FIELDS.iter().find(|f| f.name == name)
}

/// Look up a categorical field by name.
#[must_use]
pub fn categorical_field(name: &str) -> Option<&'static CategoricalField> {
    CATEGORICAL_FIELDS.iter().find(|f| f.name == name)
}

/// Income bracket label for an annual income in lakhs.
///
/// `< 10` is `<10L`, `[10, 25]` is `10L - 25L`, `(25, 40]` is `25L - 40L`,
/// anything else (including NaN) is `> 40L`.
#[must_use]
pub fn income_level_for(income_lakhs: f64) -> &'static str {
    if income_lakhs < 10.0 {
        INCOME_UNDER_10L
    } else if income_lakhs <= 25.0 {
        INCOME_10L_25L
    } else if income_lakhs <= 40.0 {
        INCOME_25L_40L
    } else {
        INCOME_OVER_40L
    }
}

// ---------------------------------------------------------------------------
// FormError
// ---------------------------------------------------------------------------

/// A value the form refuses to accept.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    /// The form has no such field (of the requested kind).
    #[error("unknown form field `{field}`")]
    UnknownField {
        /// Requested field.
        field: String,
    },
    /// The field is derived and cannot be set.
    #[error("field `{field}` is derived and cannot be set")]
    ReadOnly {
        /// Requested field.
        field: String,
    },
    /// A number outside the field's range.
    #[error("`{field}` must be in [{min}, {max}], got {value}")]
    OutOfRange {
        /// Offending field.
        field: String,
        /// Rejected value.
        value: f64,
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },
    /// A number between steps.
    #[error("`{field}` must move in steps of {step}, got {value}")]
    OffStep {
        /// Offending field.
        field: String,
        /// Rejected value.
        value: f64,
        /// Step size.
        step: u32,
    },
    /// A label outside the field's options.
    #[error("`{field}` does not offer {value:?}")]
    UnknownOption {
        /// Offending field.
        field: String,
        /// Rejected label.
        value: String,
    },
}

// ---------------------------------------------------------------------------
// ApplicationForm
// ---------------------------------------------------------------------------

/// A filled-in applicant form. Always holds a value for every field.
///
/// Starts at the widget defaults: numeric fields at their minimum,
/// categorical fields at their first option.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationForm {
    values: BTreeMap<&'static str, FieldValue>,
}

impl Default for ApplicationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationForm {
    /// A form at its defaults.
    #[must_use]
    pub fn new() -> Self {
        let mut values = BTreeMap::new();
        for field in &NUMERIC_FIELDS {
            values.insert(field.name, FieldValue::from(field.min));
        }
        for field in CATEGORICAL_FIELDS.iter().filter(|f| f.name != DERIVED_FIELD) {
            if let Some(first) = field.options.first() {
                values.insert(field.name, FieldValue::from(*first));
            }
        }
        Self { values }
    }

    /// Set a numeric field.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] if `field` is not numeric,
    /// [`FormError::OutOfRange`] or [`FormError::OffStep`] for bad values.
    pub fn set_number(&mut self, field: &str, value: f64) -> Result<&mut Self, FormError> {
        let def = numeric_field(field)
            .ok_or_else(|| FormError::UnknownField { field: field.to_owned() })?;
        if !(f64::from(def.min)..=f64::from(def.max)).contains(&value) {
            return Err(FormError::OutOfRange {
                field: field.to_owned(),
                value,
                min: def.min,
                max: def.max,
            });
        }
        let steps = (value - f64::from(def.min)) / f64::from(def.step);
        if steps.fract() != 0.0 {
            return Err(FormError::OffStep { field: field.to_owned(), value, step: def.step });
        }
        self.values.insert(def.name, FieldValue::Number(value));
        Ok(self)
    }

    /// Set a categorical field.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::ReadOnly`] for `income_level`,
    /// [`FormError::UnknownField`] if `field` is not categorical, or
    /// [`FormError::UnknownOption`] for a label outside its options.
    pub fn set_choice(&mut self, field: &str, label: &str) -> Result<&mut Self, FormError> {
        if field == DERIVED_FIELD {
            return Err(FormError::ReadOnly { field: field.to_owned() });
        }
        let def = categorical_field(field)
            .ok_or_else(|| FormError::UnknownField { field: field.to_owned() })?;
        if !def.options.contains(&label) {
            return Err(FormError::UnknownOption { field: field.to_owned(), value: label.to_owned() });
        }
        self.values.insert(def.name, FieldValue::from(label));
        Ok(self)
    }

    /// Set any field from a loosely typed value, dispatching on the catalog.
    ///
    /// # Errors
    ///
    /// As [`set_number`](Self::set_number) / [`set_choice`](Self::set_choice);
    /// a label for a numeric field or a number for a categorical field is
    /// [`FormError::UnknownOption`].
    pub fn set(&mut self, field: &str, value: &FieldValue) -> Result<&mut Self, FormError> {
        let numeric = numeric_field(field).is_some();
        match value {
            FieldValue::Number(n) if numeric => self.set_number(field, *n),
            FieldValue::Label(label) if !numeric => self.set_choice(field, label),
            _ if !numeric && categorical_field(field).is_none() => {
                Err(FormError::UnknownField { field: field.to_owned() })
            }
            _ => Err(FormError::UnknownOption { field: field.to_owned(), value: value.to_string() }),
        }
    }

    /// Current value of `field`, if the form has one.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Income bracket derived from the current `income_lakhs`.
    #[must_use]
    pub fn income_level(&self) -> &'static str {
        let income = match self.values.get("income_lakhs") {
            Some(FieldValue::Number(n)) => *n,
            _ => 0.0,
        };
        income_level_for(income)
    }

    /// Submit the form: every field plus the derived `income_level`.
    #[must_use]
    pub fn to_raw_input(&self) -> RawInput {
        let mut input: RawInput = self.values.iter().map(|(k, v)| (*k, v.clone())).collect();
        input.insert(DERIVED_FIELD, self.income_level());
        log::debug!("intake.submit: fields={}", input.len());
        input
    }

    /// Fill a form from an arbitrary raw mapping, re-deriving `income_level`.
    ///
    /// A supplied `income_level` is ignored; every other field must be valid.
    ///
    /// # Errors
    ///
    /// Returns the first [`FormError`] raised by [`set`](Self::set).
    pub fn from_raw_input(input: &RawInput) -> Result<Self, FormError> {
        let mut form = Self::new();
        for (field, value) in input.iter().filter(|(f, _)| *f != DERIVED_FIELD) {
            form.set(field, value)?;
        }
        Ok(form)
    }
}
