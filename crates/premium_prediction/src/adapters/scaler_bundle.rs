// Rust guideline compliant 2026-02-23

//! JSON scaler adapter for the `Scaler` port.
//!
//! A bundle is `{"cols_to_scale": [...], "scaler": {...}}`. The scaler is
//! either `"min_max"` (`data_min`, `data_max`, optional `feature_range`) or
//! `"standard"` (`mean`, `scale`). Zero ranges and zero scales act as 1, so a
//! constant training column passes through shifted but never divides by zero.

use std::fmt;

use domain::{Scaler, ScalingError};
use serde::Deserialize;

/// A scaler file that parsed but cannot be applied.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScalerFormatError {
    /// A parameter vector does not match `cols_to_scale`.
    #[error("`{parameter}` has {found} entries, expected {expected}")]
    LengthMismatch {
        /// Offending parameter.
        parameter: &'static str,
        /// Number of scaled columns.
        expected: usize,
        /// Number of entries supplied.
        found: usize,
    },
    /// A parameter is NaN or infinite.
    #[error("`{parameter}` contains a non-finite value")]
    NonFinite {
        /// Offending parameter.
        parameter: &'static str,
    },
}

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct BundleFile {
    cols_to_scale: Vec<String>,
    scaler: TransformFile,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TransformFile {
    MinMax {
        data_min: Vec<f64>,
        data_max: Vec<f64>,
        #[serde(default = "unit_range")]
        feature_range: (f64, f64),
    },
    Standard {
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
}

fn unit_range() -> (f64, f64) {
    (0.0, 1.0)
}

// ---------------------------------------------------------------------------
// ScalerBundle
// ---------------------------------------------------------------------------

/// Per-column affine map `x' = (x - shift) * factor + offset`.
#[derive(Debug, Clone, PartialEq)]
struct Affine {
    shift: Vec<f64>,
    factor: Vec<f64>,
    offset: f64,
}

/// Which fitted transform a bundle holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalerKind {
    /// Rescales each column from its training range to `feature_range`.
    MinMax,
    /// Centres on the training mean and divides by the training scale.
    Standard,
}

impl ScalerKind {
    /// Tag used in the scaler file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MinMax => "min_max",
            Self::Standard => "standard",
        }
    }
}

impl fmt::Display for ScalerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fitted scaler and the columns it was fitted on.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BundleFile")]
pub struct ScalerBundle {
    columns: Vec<String>,
    kind: ScalerKind,
    affine: Affine,
}

fn check(parameter: &'static str, values: &[f64], expected: usize) -> Result<(), ScalerFormatError> {
    if values.len() != expected {
        return Err(ScalerFormatError::LengthMismatch { parameter, expected, found: values.len() });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ScalerFormatError::NonFinite { parameter });
    }
    Ok(())
}

fn non_zero(x: f64) -> f64 {
    if x == 0.0 { 1.0 } else { x }
}

impl TryFrom<BundleFile> for ScalerBundle {
    type Error = ScalerFormatError;

    fn try_from(file: BundleFile) -> Result<Self, Self::Error> {
        let width = file.cols_to_scale.len();
        let (kind, affine) = match file.scaler {
            TransformFile::MinMax { data_min, data_max, feature_range: (lo, hi) } => {
                check("data_min", &data_min, width)?;
                check("data_max", &data_max, width)?;
                check("feature_range", &[lo, hi], 2)?;
                let factor = data_min
                    .iter()
                    .zip(&data_max)
                    .map(|(min, max)| (hi - lo) / non_zero(max - min))
                    .collect();
                (ScalerKind::MinMax, Affine { shift: data_min, factor, offset: lo })
            }
            TransformFile::Standard { mean, scale } => {
                check("mean", &mean, width)?;
                check("scale", &scale, width)?;
                let factor = scale.iter().map(|s| 1.0 / non_zero(*s)).collect();
                (ScalerKind::Standard, Affine { shift: mean, factor, offset: 0.0 })
            }
        };
        Ok(Self { columns: file.cols_to_scale, kind, affine })
    }
}

impl ScalerBundle {
    /// The fitted transform.
    #[must_use]
    pub fn kind(&self) -> ScalerKind {
        self.kind
    }
}

impl Scaler for ScalerBundle {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn transform(&self, values: &mut [f64]) -> Result<(), ScalingError> {
        if values.len() != self.columns.len() {
            return Err(ScalingError::WidthMismatch {
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        let Affine { shift, factor, offset } = &self.affine;
        for ((x, s), f) in values.iter_mut().zip(shift).zip(factor) {
            *x = (*x - s) * f + offset;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MIN_MAX: &str = r#"{
        "cols_to_scale": ["age", "income_level", "income_lakhs"],
        "scaler": {"kind": "min_max", "data_min": [18, 1, 1], "data_max": [25, 4, 1]}
    }"#;

    #[test]
    fn min_max_maps_range_to_unit_interval() {
        let bundle: ScalerBundle = serde_json::from_str(MIN_MAX).unwrap();
        assert_eq!(bundle.kind(), ScalerKind::MinMax);
        assert_eq!(bundle.columns(), ["age", "income_level", "income_lakhs"]);
        let mut values = [25.0, 0.0, 3.0];
        bundle.transform(&mut values).unwrap();
        assert_relative_eq!(values[0], 1.0);
        assert_relative_eq!(values[1], -1.0 / 3.0);
        // Zero training range: treated as 1.
        assert_relative_eq!(values[2], 2.0);
    }

    #[test]
    fn min_max_honours_feature_range() {
        let json = r#"{"cols_to_scale": ["age"], "scaler":
            {"kind": "min_max", "data_min": [0], "data_max": [10], "feature_range": [-1, 1]}}"#;
        let bundle: ScalerBundle = serde_json::from_str(json).unwrap();
        let mut values = [5.0];
        bundle.transform(&mut values).unwrap();
        assert_relative_eq!(values[0], 0.0);
    }

    #[test]
    fn standard_scaler_centres_and_scales() {
        let json = r#"{"cols_to_scale": ["age", "insurance_plan"], "scaler":
            {"kind": "standard", "mean": [40, 2], "scale": [10, 0]}}"#;
        let bundle: ScalerBundle = serde_json::from_str(json).unwrap();
        assert_eq!(bundle.kind().to_string(), "standard");
        let mut values = [55.0, 3.0];
        bundle.transform(&mut values).unwrap();
        assert_relative_eq!(values[0], 1.5);
        assert_relative_eq!(values[1], 1.0);
    }

    /// The loader reads owned text, so the bundle must not borrow from it.
    #[test]
    fn bundle_deserializes_from_owned_text() {
        fn parse_owned<T: serde::de::DeserializeOwned>(text: String) -> T {
            serde_json::from_str(&text).unwrap()
        }
        let bundle: ScalerBundle = parse_owned(MIN_MAX.to_owned());
        assert_eq!(bundle.kind(), ScalerKind::MinMax);
        assert_eq!(bundle.columns().len(), 3);
    }

    #[test]
    fn parameter_length_must_match_columns() {
        let json = r#"{"cols_to_scale": ["age", "income_lakhs"], "scaler":
            {"kind": "standard", "mean": [40], "scale": [10, 1]}}"#;
        let err = serde_json::from_str::<ScalerBundle>(json).unwrap_err();
        assert!(err.to_string().contains("`mean` has 1 entries, expected 2"), "{err}");
    }

    #[test]
    fn transform_rejects_wrong_width() {
        let bundle: ScalerBundle = serde_json::from_str(MIN_MAX).unwrap();
        let mut values = [1.0, 2.0];
        assert_eq!(
            bundle.transform(&mut values),
            Err(ScalingError::WidthMismatch { expected: 3, found: 2 })
        );
    }
}
