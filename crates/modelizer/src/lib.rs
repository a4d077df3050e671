// Rust guideline compliant 2026-02-23

//! Age-dispatched scaling and regression for the premium-prediction pipeline.
//!
//! [`Predictor`] runs one request end to end: feature assembly, cohort
//! selection, scaling with the cohort's `domain::Scaler`, and prediction with
//! the cohort's `domain::Regressor`. It owns no concrete model logic -- the
//! four artifacts are injected once through an [`ArtifactContext`].
//!
//! Entry points: [`Predictor::predict`], [`scale_features`].
//! Configuration via [`PredictorConfig::builder`].

use domain::{
    Cohort, Column, DEFAULT_YOUNG_AGE_LIMIT, FeatureVector, INCOME_LEVEL_COLUMN, InputError,
    ModelError, Prediction, RawInput, Regressor, Scaler, ScalingError,
};

// ---------------------------------------------------------------------------
// PredictorError
// ---------------------------------------------------------------------------

/// Errors that can occur while building or running a [`Predictor`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictorError {
    /// The supplied configuration is invalid.
    #[error("invalid predictor configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// A scaler was fitted on a column the pipeline cannot supply.
    #[error("{cohort} scaler uses unknown column `{column}`")]
    UnknownScalerColumn {
        /// Cohort of the offending scaler.
        cohort: Cohort,
        /// The unknown column name.
        column: String,
    },
    /// The raw input carried a value of the wrong kind.
    #[error("invalid input: {0}")]
    Input(#[from] InputError),
    /// The cohort's scaler failed.
    #[error("{cohort} scaler failed: {source}")]
    Scaling {
        /// Cohort whose scaler failed.
        cohort: Cohort,
        /// The underlying scaler error.
        source: ScalingError,
    },
    /// The cohort's model failed.
    #[error("{cohort} model failed: {source}")]
    Model {
        /// Cohort whose model failed.
        cohort: Cohort,
        /// The underlying model error.
        source: ModelError,
    },
}

// ---------------------------------------------------------------------------
// PredictorConfig + builder
// ---------------------------------------------------------------------------

/// Runtime configuration for a [`Predictor`].
///
/// Construct via [`PredictorConfig::builder`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictorConfig {
    /// Applicants with `age <= young_age_limit` use the young artifacts.
    pub young_age_limit: f64,
}

/// Builder for [`PredictorConfig`].
///
/// Obtain via [`PredictorConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct PredictorConfigBuilder {
    young_age_limit: f64,
}

impl PredictorConfig {
    /// Create a builder. Default: `young_age_limit = 25`, the age split the
    /// shipped artifacts were trained on.
    #[must_use]
    pub fn builder() -> PredictorConfigBuilder {
        PredictorConfigBuilder { young_age_limit: DEFAULT_YOUNG_AGE_LIMIT }
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self { young_age_limit: DEFAULT_YOUNG_AGE_LIMIT }
    }
}

impl PredictorConfigBuilder {
    /// Override the inclusive upper age of the young cohort.
    #[must_use]
    pub fn young_age_limit(mut self, young_age_limit: f64) -> Self {
        self.young_age_limit = young_age_limit;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PredictorError::InvalidConfig`] when the age limit is
    /// negative or not finite.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<PredictorConfig, PredictorError> {
        if !self.young_age_limit.is_finite() || self.young_age_limit < 0.0 {
            return Err(PredictorError::InvalidConfig {
                reason: format!(
                    "young_age_limit must be finite and >= 0, got {}",
                    self.young_age_limit
                ),
            });
        }
        Ok(PredictorConfig { young_age_limit: self.young_age_limit })
    }
}

// ---------------------------------------------------------------------------
// ArtifactContext
// ---------------------------------------------------------------------------

/// A model and the scaler fitted alongside it.
#[derive(Debug)]
pub struct CohortArtifacts<M, S> {
    /// Trained regression model.
    pub model: M,
    /// Scaler fitted on the same training split as `model`.
    pub scaler: S,
}

/// The loaded-once artifacts, grouped into matched cohort pairs.
///
/// Immutable after construction; share it by reference across requests.
#[derive(Debug)]
pub struct ArtifactContext<M, S> {
    young: CohortArtifacts<M, S>,
    rest: CohortArtifacts<M, S>,
}

impl<M: Regressor, S: Scaler> ArtifactContext<M, S> {
    /// Group the four artifacts, checking that each scaler only names
    /// columns the scaling frame provides.
    ///
    /// # Errors
    ///
    /// Returns [`PredictorError::UnknownScalerColumn`] for the first scaler
    /// column that is neither a schema column nor `income_level`.
    pub fn new(
        young: CohortArtifacts<M, S>,
        rest: CohortArtifacts<M, S>,
    ) -> Result<Self, PredictorError> {
        for (cohort, pair) in [(Cohort::Young, &young), (Cohort::Rest, &rest)] {
            if let Some(column) = pair.scaler.columns().iter().find(|c| !in_scaling_frame(c)) {
                return Err(PredictorError::UnknownScalerColumn { cohort, column: column.clone() });
            }
            log::info!(
                "modelizer.context: cohort={cohort} model={} scaled_columns={}",
                pair.model.name(),
                pair.scaler.columns().len()
            );
        }
        Ok(Self { young, rest })
    }

    /// The matched pair serving `cohort`.
    #[must_use]
    pub fn get(&self, cohort: Cohort) -> &CohortArtifacts<M, S> {
        match cohort {
            Cohort::Young => &self.young,
            Cohort::Rest => &self.rest,
        }
    }
}

fn in_scaling_frame(column: &str) -> bool {
    column == INCOME_LEVEL_COLUMN || Column::from_name(column).is_some()
}

// ---------------------------------------------------------------------------
// Scaling
// ---------------------------------------------------------------------------

/// Apply `scaler` to its own columns of `features`, in place.
///
/// The scaling frame is the schema plus a transient `income_level` column
/// pinned to zero. Columns the scaler does not name keep their values;
/// `income_level` is dropped again after the transform.
///
/// # Errors
///
/// Returns [`ScalingError::MissingColumn`] when the scaler names a column
/// outside the frame, or any error raised by the transform itself.
pub fn scale_features<S: Scaler>(
    scaler: &S,
    mut features: FeatureVector,
) -> Result<FeatureVector, ScalingError> {
    let columns = scaler.columns();
    let mut targets: Vec<Option<Column>> = Vec::with_capacity(columns.len());
    let mut values: Vec<f64> = Vec::with_capacity(columns.len());
    for name in columns {
        if name == INCOME_LEVEL_COLUMN {
            targets.push(None);
            values.push(0.0);
        } else {
            let column = Column::from_name(name)
                .ok_or_else(|| ScalingError::MissingColumn { column: name.clone() })?;
            targets.push(Some(column));
            values.push(features[column]);
        }
    }

    scaler.transform(&mut values)?;

    for (target, value) in targets.into_iter().zip(values) {
        if let Some(column) = target {
            features[column] = value;
        }
    }
    Ok(features)
}

// ---------------------------------------------------------------------------
// Predictor
// ---------------------------------------------------------------------------

/// Runs the full raw-input-to-premium pipeline against injected artifacts.
///
/// Generic over the `Regressor` and `Scaler` ports for static dispatch.
/// Stateless between calls: identical inputs always produce identical
/// predictions.
#[derive(Debug)]
pub struct Predictor<M, S> {
    config: PredictorConfig,
    artifacts: ArtifactContext<M, S>,
}

impl<M: Regressor, S: Scaler> Predictor<M, S> {
    /// Create a predictor over the loaded `artifacts`.
    #[must_use]
    pub fn new(config: PredictorConfig, artifacts: ArtifactContext<M, S>) -> Self {
        Self { config, artifacts }
    }

    /// Predict the premium for one applicant.
    ///
    /// The cohort is chosen once from the assembled `age` column and used for
    /// both scaler and model, so the two always come from the same pair.
    ///
    /// # Errors
    ///
    /// Returns [`PredictorError::Input`] for malformed input, or
    /// [`PredictorError::Scaling`] / [`PredictorError::Model`] when an
    /// artifact fails.
    pub fn predict(&self, input: &RawInput) -> Result<Prediction, PredictorError> {
        let features = features::assemble(input)?;
        self.predict_features(features)
    }

    /// Predict from an already assembled (unscaled) feature row.
    ///
    /// # Errors
    ///
    /// See [`predict`](Self::predict).
    pub fn predict_features(&self, features: FeatureVector) -> Result<Prediction, PredictorError> {
        let age = features[Column::Age];
        let cohort = self.cohort_for(age);
        log::debug!("predictor.predict: age={age} cohort={cohort}");
        let scaled = self.scale(cohort, features)?;
        let premium = self.dispatch_model(cohort, &scaled)?;
        log::debug!("predictor.predict: premium={premium}");
        Ok(Prediction { premium, cohort })
    }

    /// Cohort serving an applicant of `age`.
    #[must_use]
    pub fn cohort_for(&self, age: f64) -> Cohort {
        Cohort::for_age(age, self.config.young_age_limit)
    }

    /// Scaling Dispatcher: scale `features` with the scaler of `cohort`.
    ///
    /// # Errors
    ///
    /// Returns [`PredictorError::Scaling`] when the scaler fails.
    pub fn scale(
        &self,
        cohort: Cohort,
        features: FeatureVector,
    ) -> Result<FeatureVector, PredictorError> {
        scale_features(&self.artifacts.get(cohort).scaler, features)
            .map_err(|source| PredictorError::Scaling { cohort, source })
    }

    /// Model Dispatcher: run the model of `cohort` and truncate toward zero.
    ///
    /// # Errors
    ///
    /// Returns [`PredictorError::Model`] when the model fails or produces a
    /// non-finite value.
    pub fn dispatch_model(
        &self,
        cohort: Cohort,
        scaled: &FeatureVector,
    ) -> Result<i64, PredictorError> {
        let raw = self
            .artifacts
            .get(cohort)
            .model
            .predict(scaled)
            .map_err(|source| PredictorError::Model { cohort, source })?;
        if !raw.is_finite() {
            return Err(PredictorError::Model {
                cohort,
                source: ModelError::NonFinite { value: raw },
            });
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "premium is an integer amount; saturating cast on overflow"
        )]
        let premium = raw.trunc() as i64;
        Ok(premium)
    }

    /// The configuration this predictor runs with.
    #[must_use]
    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::{Cell, RefCell};

    // ------------------------------------------------------------------
    // Mock adapters
    // ------------------------------------------------------------------

    /// Overwrites every scaled value with `marker`, recording its input.
    #[derive(Debug)]
    struct MarkerScaler {
        columns: Vec<String>,
        marker: f64,
        seen: RefCell<Vec<f64>>,
    }

    impl MarkerScaler {
        fn new(columns: &[&str], marker: f64) -> Self {
            Self {
                columns: columns.iter().map(|c| (*c).to_owned()).collect(),
                marker,
                seen: RefCell::new(vec![]),
            }
        }
    }

    impl Scaler for MarkerScaler {
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
            self.seen.borrow_mut().extend_from_slice(values);
            values.fill(self.marker);
            Ok(())
        }
    }

    /// Returns `age + offset`; counts calls.
    #[derive(Debug)]
    struct EchoModel {
        offset: f64,
        calls: Cell<u32>,
    }

    impl EchoModel {
        fn new(offset: f64) -> Self {
            Self { offset, calls: Cell::new(0) }
        }
    }

    impl Regressor for EchoModel {
        fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
            self.calls.set(self.calls.get() + 1);
            Ok(features[Column::Age] + self.offset)
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    /// Always fails, or returns a fixed value.
    #[derive(Debug)]
    struct FixedModel(Result<f64, ModelError>);

    impl Regressor for FixedModel {
        fn predict(&self, _features: &FeatureVector) -> Result<f64, ModelError> {
            self.0.clone()
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn marker_predictor() -> Predictor<EchoModel, MarkerScaler> {
        let young = CohortArtifacts {
            model: EchoModel::new(10.0),
            scaler: MarkerScaler::new(&["age", "income_level"], 1000.0),
        };
        let rest = CohortArtifacts {
            model: EchoModel::new(20.0),
            scaler: MarkerScaler::new(&["age", "income_level"], 2000.0),
        };
        Predictor::new(PredictorConfig::default(), ArtifactContext::new(young, rest).unwrap())
    }

    fn fixed_predictor(result: Result<f64, ModelError>) -> Predictor<FixedModel, MarkerScaler> {
        let young = CohortArtifacts { model: FixedModel(result.clone()), scaler: MarkerScaler::new(&[], 0.0) };
        let rest = CohortArtifacts { model: FixedModel(result), scaler: MarkerScaler::new(&[], 0.0) };
        Predictor::new(PredictorConfig::default(), ArtifactContext::new(young, rest).unwrap())
    }

    fn applicant(age: u32) -> RawInput {
        RawInput::new()
            .with("age", age)
            .with("income_lakhs", 45_u32)
            .with("income_level", "> 40L")
            .with("insurance_plan", "Silver")
            .with("gender", "Male")
    }

    // ------------------------------------------------------------------
    // Config
    // ------------------------------------------------------------------

    #[test]
    fn config_defaults_to_twenty_five() {
        let cfg = PredictorConfig::builder().build().unwrap();
        assert_relative_eq!(cfg.young_age_limit, 25.0);
        assert_eq!(cfg, PredictorConfig::default());
    }

    #[test]
    fn config_rejects_negative_or_nan_limit() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let cfg = PredictorConfig::builder().young_age_limit(bad).build();
            assert!(matches!(cfg, Err(PredictorError::InvalidConfig { .. })), "{bad} accepted");
        }
    }

    // ------------------------------------------------------------------
    // Context validation
    // ------------------------------------------------------------------

    #[test]
    fn context_rejects_unknown_scaler_column() {
        let young = CohortArtifacts { model: EchoModel::new(0.0), scaler: MarkerScaler::new(&["age"], 0.0) };
        let rest = CohortArtifacts {
            model: EchoModel::new(0.0),
            scaler: MarkerScaler::new(&["age", "total_risk_score"], 0.0),
        };
        let err = ArtifactContext::new(young, rest).unwrap_err();
        assert_eq!(
            err,
            PredictorError::UnknownScalerColumn {
                cohort: Cohort::Rest,
                column: "total_risk_score".to_owned()
            }
        );
    }

    // ------------------------------------------------------------------
    // Dispatch pairing
    // ------------------------------------------------------------------

    #[test]
    fn age_25_uses_young_pair() {
        let p = marker_predictor();
        let prediction = p.predict(&applicant(25)).unwrap();
        assert_eq!(prediction, Prediction { premium: 1010, cohort: Cohort::Young });
        assert_eq!(p.artifacts.get(Cohort::Young).model.calls.get(), 1);
        assert_eq!(p.artifacts.get(Cohort::Rest).model.calls.get(), 0);
    }

    #[test]
    fn age_26_uses_rest_pair() {
        let p = marker_predictor();
        let prediction = p.predict(&applicant(26)).unwrap();
        assert_eq!(prediction, Prediction { premium: 2020, cohort: Cohort::Rest });
        assert!(p.artifacts.get(Cohort::Young).scaler.seen.borrow().is_empty());
    }

    #[test]
    fn custom_age_limit_moves_the_split() {
        let young = CohortArtifacts { model: EchoModel::new(10.0), scaler: MarkerScaler::new(&["age"], 1000.0) };
        let rest = CohortArtifacts { model: EchoModel::new(20.0), scaler: MarkerScaler::new(&["age"], 2000.0) };
        let cfg = PredictorConfig::builder().young_age_limit(30.0).build().unwrap();
        let p = Predictor::new(cfg, ArtifactContext::new(young, rest).unwrap());
        assert_eq!(p.predict(&applicant(30)).unwrap().cohort, Cohort::Young);
        assert_eq!(p.predict(&applicant(31)).unwrap().cohort, Cohort::Rest);
    }

    #[test]
    fn missing_age_routes_young() {
        let p = marker_predictor();
        let prediction = p.predict(&RawInput::new()).unwrap();
        assert_eq!(prediction.cohort, Cohort::Young);
    }

    // ------------------------------------------------------------------
    // Scaling
    // ------------------------------------------------------------------

    #[test]
    fn income_level_is_pinned_to_zero_and_dropped() {
        let p = marker_predictor();
        p.predict(&applicant(40)).unwrap();
        // Scaler saw [age, income_level] with income_level forced to 0.
        assert_eq!(*p.artifacts.get(Cohort::Rest).scaler.seen.borrow(), vec![40.0, 0.0]);
    }

    #[test]
    fn unscaled_columns_are_preserved() {
        let scaler = MarkerScaler::new(&["income_lakhs"], 7.0);
        let mut features = FeatureVector::zeroed();
        features[Column::Age] = 33.0;
        features[Column::IncomeLakhs] = 45.0;
        features[Column::GenderMale] = 1.0;
        let scaled = scale_features(&scaler, features).unwrap();
        assert_relative_eq!(scaled[Column::IncomeLakhs], 7.0);
        assert_relative_eq!(scaled[Column::Age], 33.0);
        assert_relative_eq!(scaled[Column::GenderMale], 1.0);
        assert!(scaled.get("income_level").is_none());
    }

    #[test]
    fn scaler_with_unknown_column_fails() {
        let scaler = MarkerScaler::new(&["bogus"], 0.0);
        let err = scale_features(&scaler, FeatureVector::zeroed()).unwrap_err();
        assert_eq!(err, ScalingError::MissingColumn { column: "bogus".to_owned() });
    }

    // ------------------------------------------------------------------
    // Model dispatch
    // ------------------------------------------------------------------

    #[test]
    fn premium_truncates_toward_zero() {
        assert_eq!(fixed_predictor(Ok(12_345.99)).predict(&applicant(40)).unwrap().premium, 12_345);
        assert_eq!(fixed_predictor(Ok(-12.7)).predict(&applicant(40)).unwrap().premium, -12);
    }

    #[test]
    fn model_failure_is_fatal_for_the_request() {
        let p = fixed_predictor(Err(ModelError::PredictionFailed { reason: "corrupt".to_owned() }));
        let err = p.predict(&applicant(20)).unwrap_err();
        assert!(matches!(err, PredictorError::Model { cohort: Cohort::Young, .. }), "{err:?}");
    }

    #[test]
    fn non_finite_prediction_is_rejected() {
        let err = fixed_predictor(Ok(f64::NAN)).predict(&applicant(50)).unwrap_err();
        assert!(matches!(
            err,
            PredictorError::Model { cohort: Cohort::Rest, source: ModelError::NonFinite { .. } }
        ));
    }

    #[test]
    fn malformed_input_propagates() {
        let err = marker_predictor().predict(&applicant(30).with("age", "old")).unwrap_err();
        assert!(matches!(err, PredictorError::Input(InputError::NotNumeric { .. })));
    }

    #[test]
    fn repeated_predictions_are_identical() {
        let p = marker_predictor();
        let input = applicant(47).with("medical_history", "Diabetes");
        assert_eq!(p.predict(&input).unwrap(), p.predict(&input).unwrap());
    }
}
