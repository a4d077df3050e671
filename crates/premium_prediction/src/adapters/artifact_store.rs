// Rust guideline compliant 2026-02-23

//! Loads the four model/scaler artifacts from one directory.
//!
//! Files are read concurrently on the caller's runtime and parsed with
//! `serde_json`. Any missing, malformed, or mutually inconsistent file is
//! fatal: without all four artifacts no prediction can be served.

use std::path::{Path, PathBuf};

use domain::Cohort;
use modelizer::{ArtifactContext, CohortArtifacts, PredictorError};
use serde::de::DeserializeOwned;

use super::regression_model::RegressionModel;
use super::scaler_bundle::ScalerBundle;

/// The loaded artifact context served by this binary.
pub type LoadedArtifacts = ArtifactContext<RegressionModel, ScalerBundle>;

// ---------------------------------------------------------------------------
// ArtifactError
// ---------------------------------------------------------------------------

/// Errors that can occur while loading artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// The supplied configuration is invalid.
    #[error("invalid artifact store configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// A file is not a valid artifact.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },
    /// The artifacts parsed but do not fit together.
    #[error("inconsistent artifacts: {0}")]
    Context(#[from] PredictorError),
}

// ---------------------------------------------------------------------------
// ArtifactStoreConfig + builder
// ---------------------------------------------------------------------------

/// Where the four artifacts live.
///
/// Construct via [`ArtifactStoreConfig::builder`].
#[derive(Debug, Clone)]
pub struct ArtifactStoreConfig {
    /// Directory holding all four files.
    pub dir: PathBuf,
    /// File name of the young-cohort model.
    pub model_young: String,
    /// File name of the rest-cohort model.
    pub model_rest: String,
    /// File name of the young-cohort scaler.
    pub scaler_young: String,
    /// File name of the rest-cohort scaler.
    pub scaler_rest: String,
}

/// Builder for [`ArtifactStoreConfig`].
///
/// Obtain via [`ArtifactStoreConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct ArtifactStoreConfigBuilder {
    dir: PathBuf,
    model_young: String,
    model_rest: String,
    scaler_young: String,
    scaler_rest: String,
}

impl ArtifactStoreConfig {
    /// Create a builder. `dir` is the only required parameter.
    ///
    /// Default file names: `model_young.json`, `model_rest.json`,
    /// `scaler_young.json`, `scaler_rest.json`.
    #[must_use]
    pub fn builder(dir: impl Into<PathBuf>) -> ArtifactStoreConfigBuilder {
        ArtifactStoreConfigBuilder {
            dir: dir.into(),
            model_young: "model_young.json".to_owned(),
            model_rest: "model_rest.json".to_owned(),
            scaler_young: "scaler_young.json".to_owned(),
            scaler_rest: "scaler_rest.json".to_owned(),
        }
    }

    /// Path of the model file for `cohort`.
    #[must_use]
    pub fn model_path(&self, cohort: Cohort) -> PathBuf {
        match cohort {
            Cohort::Young => self.dir.join(&self.model_young),
            Cohort::Rest => self.dir.join(&self.model_rest),
        }
    }

    /// Path of the scaler file for `cohort`.
    #[must_use]
    pub fn scaler_path(&self, cohort: Cohort) -> PathBuf {
        match cohort {
            Cohort::Young => self.dir.join(&self.scaler_young),
            Cohort::Rest => self.dir.join(&self.scaler_rest),
        }
    }
}

impl ArtifactStoreConfigBuilder {
    /// Override the young-cohort model file name.
    #[must_use]
    pub fn model_young(mut self, name: &str) -> Self {
        name.clone_into(&mut self.model_young);
        self
    }

    /// Override the rest-cohort model file name.
    #[must_use]
    pub fn model_rest(mut self, name: &str) -> Self {
        name.clone_into(&mut self.model_rest);
        self
    }

    /// Override the young-cohort scaler file name.
    #[must_use]
    pub fn scaler_young(mut self, name: &str) -> Self {
        name.clone_into(&mut self.scaler_young);
        self
    }

    /// Override the rest-cohort scaler file name.
    #[must_use]
    pub fn scaler_rest(mut self, name: &str) -> Self {
        name.clone_into(&mut self.scaler_rest);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::InvalidConfig`] when any file name is empty.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<ArtifactStoreConfig, ArtifactError> {
        for (what, name) in [
            ("model_young", &self.model_young),
            ("model_rest", &self.model_rest),
            ("scaler_young", &self.scaler_young),
            ("scaler_rest", &self.scaler_rest),
        ] {
            if name.trim().is_empty() {
                return Err(ArtifactError::InvalidConfig {
                    reason: format!("{what} file name must not be empty"),
                });
            }
        }
        Ok(ArtifactStoreConfig {
            dir: self.dir,
            model_young: self.model_young,
            model_rest: self.model_rest,
            scaler_young: self.scaler_young,
            scaler_rest: self.scaler_rest,
        })
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate all four artifacts.
///
/// # Errors
///
/// Returns [`ArtifactError::Read`] or [`ArtifactError::Parse`] for the first
/// file that fails, or [`ArtifactError::Context`] when a scaler names a
/// column the pipeline cannot supply.
pub async fn load_artifacts(config: &ArtifactStoreConfig) -> Result<LoadedArtifacts, ArtifactError> {
    let young_model_path = config.model_path(Cohort::Young);
    let rest_model_path = config.model_path(Cohort::Rest);
    let young_scaler_path = config.scaler_path(Cohort::Young);
    let rest_scaler_path = config.scaler_path(Cohort::Rest);
    let (young_model, rest_model, young_scaler, rest_scaler) = tokio::try_join!(
        read_json::<RegressionModel>(&young_model_path),
        read_json::<RegressionModel>(&rest_model_path),
        read_json::<ScalerBundle>(&young_scaler_path),
        read_json::<ScalerBundle>(&rest_scaler_path),
    )?;
    let (young_kind, rest_kind) = (young_scaler.kind(), rest_scaler.kind());
    let context = ArtifactContext::new(
        CohortArtifacts { model: young_model, scaler: young_scaler },
        CohortArtifacts { model: rest_model, scaler: rest_scaler },
    )?;
    tracing::info!(
        dir = %config.dir.display(),
        scaler_young = %young_kind,
        scaler_rest = %rest_kind,
        "artifact_store.loaded"
    );
    Ok(context)
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ArtifactError::Read { path: path.to_owned(), source })?;
    let value = serde_json::from_str(&text)
        .map_err(|source| ArtifactError::Parse { path: path.to_owned(), source })?;
    tracing::debug!(path = %path.display(), "artifact_store.read");
    Ok(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
