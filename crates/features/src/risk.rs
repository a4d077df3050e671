// Rust guideline compliant 2026-02-23

//! Risk Scorer: medical history label to normalized comorbidity score.

use crate::LookupTable;

/// Severity weight per lower-case condition name. Unknown conditions weigh 0.
pub const RISK_WEIGHTS: LookupTable = LookupTable::new(
    &[
        ("diabetes", 6),
        ("heart disease", 8),
        ("high blood pressure", 6),
        ("thyroid", 5),
        ("no disease", 0),
        ("none", 0),
    ],
    0,
);

/// Conditions in a history label are joined with this character.
pub const CONDITION_SEPARATOR: char = '&';

/// Risk of one medical history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskScore {
    /// Sum of the weights of every listed condition.
    pub total: u32,
    /// `total` rescaled by the single-condition weight range.
    ///
    /// Not bounded by 1: two severe conditions score above 1.
    pub normalized: f64,
}

/// Score a medical history label such as `"Diabetes & Heart disease"`.
#[must_use]
pub fn score(medical_history: &str) -> RiskScore {
    let total = total_risk_score(medical_history);
    RiskScore { total, normalized: normalize(total, &RISK_WEIGHTS) }
}

/// Sum of condition weights; tokens are trimmed and lower-cased first.
#[must_use]
pub fn total_risk_score(medical_history: &str) -> u32 {
    medical_history
        .split(CONDITION_SEPARATOR)
        .map(|token| RISK_WEIGHTS.lookup(&token.trim().to_lowercase()))
        .sum()
}

/// `(total - min) / (max - min)` over the weights of `table`.
///
/// A table whose weights are all equal (or which is empty) normalizes to 0.
#[must_use]
pub fn normalize(total: u32, table: &LookupTable) -> f64 {
    let (Some(min), Some(max)) = (table.min(), table.max()) else {
        return 0.0;
    };
    if max == min {
        return 0.0;
    }
    (f64::from(total) - f64::from(min)) / f64::from(max - min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn diabetes_and_heart_disease() {
        let s = score("Diabetes & Heart disease");
        assert_eq!(s.total, 14);
        assert_relative_eq!(s.normalized, 1.75);
    }

    #[test]
    fn no_disease_scores_zero() {
        let s = score("No Disease");
        assert_eq!(s.total, 0);
        assert_relative_eq!(s.normalized, 0.0);
    }

    #[test]
    fn single_conditions() {
        assert_relative_eq!(score("Heart disease").normalized, 1.0);
        assert_relative_eq!(score("Thyroid").normalized, 0.625);
        assert_relative_eq!(score("High blood pressure").normalized, 0.75);
    }

    #[test]
    fn tokens_are_trimmed_and_case_folded() {
        assert_eq!(total_risk_score("  DIABETES&thyroid  "), 11);
        assert_eq!(total_risk_score("High blood pressure & Heart disease"), 14);
    }

    #[test]
    fn unknown_conditions_weigh_nothing() {
        assert_eq!(total_risk_score("Asthma"), 0);
        assert_eq!(total_risk_score("Asthma & Diabetes"), 6);
        assert_eq!(total_risk_score(""), 0);
    }

    #[test]
    fn flat_table_normalizes_to_zero() {
        let flat = LookupTable::new(&[("a", 3), ("b", 3)], 0);
        assert_relative_eq!(normalize(3, &flat), 0.0);
        let empty = LookupTable::new(&[], 0);
        assert_relative_eq!(normalize(5, &empty), 0.0);
    }
}
