// Rust guideline compliant 2026-02-23

//! Categorical Encoder: ordinal codes and schema-driven one-hot indicators.

use domain::{Column, FeatureVector, ONE_HOT_COLUMNS, RawInput};

use crate::LookupTable;

/// Ranked insurance plans. Unknown plans encode as 0.
pub const INSURANCE_PLANS: LookupTable =
    LookupTable::new(&[("Bronze", 1), ("Silver", 2), ("Gold", 3)], 0);

/// Ranked income brackets, labelled as the form derives them. Unknown
/// brackets encode as 0.
pub const INCOME_LEVELS: LookupTable = LookupTable::new(
    &[("<10L", 1), ("10L - 25L", 2), ("25L - 40L", 3), ("> 40L", 4)],
    0,
);

/// Ordinal codes of one applicant. Missing fields encode as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrdinalCodes {
    /// `insurance_plan` code (1..=3, or 0).
    pub insurance_plan: u32,
    /// `income_level` code (1..=4, or 0). No schema column carries it.
    pub income_level: u32,
}

/// Ordinal-encode `insurance_plan` and `income_level`.
#[must_use]
pub fn encode_ordinals(input: &RawInput) -> OrdinalCodes {
    OrdinalCodes {
        insurance_plan: ordinal(input, "insurance_plan", &INSURANCE_PLANS),
        income_level: ordinal(input, "income_level", &INCOME_LEVELS),
    }
}

fn ordinal(input: &RawInput, field: &str, table: &LookupTable) -> u32 {
    input.get(field).map_or(0, |value| table.lookup(&value.to_label()))
}

/// Indicator columns switched on by `input`.
///
/// A column is on when the field's string form equals the column's label
/// exactly. Missing or unrecognised fields switch nothing on.
pub fn hot_columns(input: &RawInput) -> impl Iterator<Item = Column> + '_ {
    ONE_HOT_COLUMNS
        .iter()
        .filter(|entry| input.get(entry.field).is_some_and(|v| v.to_label() == entry.value))
        .map(|entry| entry.column)
}

/// Write one-hot indicators into `features`; other columns are untouched.
pub fn encode_one_hot(input: &RawInput, features: &mut FeatureVector) {
    for column in hot_columns(input) {
        features[column] = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insurance_plan_codes() {
        for (plan, code) in [("Bronze", 1), ("Silver", 2), ("Gold", 3)] {
            let input = RawInput::new().with("insurance_plan", plan);
            assert_eq!(encode_ordinals(&input).insurance_plan, code);
        }
    }

    #[test]
    fn unknown_or_missing_plan_is_zero() {
        let input = RawInput::new().with("insurance_plan", "");
        assert_eq!(encode_ordinals(&input).insurance_plan, 0);
        let input = RawInput::new().with("insurance_plan", "Platinum");
        assert_eq!(encode_ordinals(&input).insurance_plan, 0);
        assert_eq!(encode_ordinals(&RawInput::new()), OrdinalCodes::default());
    }

    #[test]
    fn income_level_codes() {
        let input = RawInput::new().with("income_level", "25L - 40L");
        assert_eq!(encode_ordinals(&input).income_level, 3);
        let input = RawInput::new().with("income_level", "> 40L");
        assert_eq!(encode_ordinals(&input).income_level, 4);
        let input = RawInput::new().with("income_level", ">40L");
        assert_eq!(encode_ordinals(&input).income_level, 0, "labels must match exactly");
    }

    #[test]
    fn female_is_the_absorbed_reference() {
        let mut v = FeatureVector::zeroed();
        encode_one_hot(&RawInput::new().with("gender", "Female"), &mut v);
        assert!(v.as_slice().iter().all(|x| x.abs() < f64::EPSILON));

        let mut v = FeatureVector::zeroed();
        encode_one_hot(&RawInput::new().with("gender", "Male"), &mut v);
        assert!((v[Column::GenderMale] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn one_indicator_per_field_at_most() {
        let input = RawInput::new()
            .with("region", "Southeast")
            .with("bmi_category", "Obesity")
            .with("smoking_status", "Regular")
            .with("employment_status", "Self-Employed")
            .with("marital_status", "Unmarried");
        let hot: Vec<Column> = hot_columns(&input).collect();
        assert_eq!(
            hot,
            [
                Column::RegionSoutheast,
                Column::MaritalStatusUnmarried,
                Column::BmiCategoryObesity,
                Column::SmokingStatusRegular,
                Column::EmploymentStatusSelfEmployed,
            ]
        );
    }

    #[test]
    fn unrecognised_labels_switch_nothing_on() {
        let input = RawInput::new()
            .with("region", "northwest")
            .with("smoking_status", "No Smoking")
            .with("gender", 1_u32);
        assert_eq!(hot_columns(&input).count(), 0);
    }
}
