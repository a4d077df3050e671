// Rust guideline compliant 2026-02-23

//! Feature Assembler: raw input to one schema-ordered feature row.

use domain::{Column, FeatureVector, InputError, RawInput};

use crate::{encoder, risk};

/// Numeric fields copied through unchanged.
pub const NUMERIC_FIELDS: [(&str, Column); 4] = [
    ("age", Column::Age),
    ("number_of_dependants", Column::NumberOfDependants),
    ("income_lakhs", Column::IncomeLakhs),
    ("genetical_risk", Column::GeneticalRisk),
];

/// Build the model-ready feature row for `input`.
///
/// Every column starts at zero. Missing fields leave their columns at zero,
/// unknown labels encode as zero. The intermediate total risk score and the
/// `income_level` code are computed but never reach the row.
///
/// # Errors
///
/// Returns [`InputError::NotNumeric`] when a numeric field carries a label,
/// or [`InputError::NotLabel`] when `medical_history` carries a number.
pub fn assemble(input: &RawInput) -> Result<FeatureVector, InputError> {
    let mut features = FeatureVector::zeroed();

    for (field, column) in NUMERIC_FIELDS {
        if let Some(value) = input.get(field) {
            features[column] = value.as_number(field)?;
        }
    }

    let codes = encoder::encode_ordinals(input);
    for (field, code) in [
        ("insurance_plan", codes.insurance_plan),
        ("income_level", codes.income_level),
    ] {
        // Only schema columns are written; income_level has none.
        match Column::from_name(field) {
            Some(column) => features[column] = f64::from(code),
            None => log::trace!("features.assemble: dropping {field}={code}"),
        }
    }

    if let Some(history) = input.get("medical_history") {
        let score = risk::score(history.as_label("medical_history")?);
        log::debug!(
            "features.assemble: total_risk_score={} normalized_risk_score={}",
            score.total,
            score.normalized
        );
        features[Column::NormalizedRiskScore] = score.normalized;
    }

    encoder::encode_one_hot(input, &mut features);
    Ok(features)
}
