// Rust guideline compliant 2026-02-23

//! Health-insurance premium prediction entry point.
//!
//! Loads the four artifacts once, then quotes either applicants read as JSON
//! (`predict`) or randomly generated applicants (`sample`). Each quote is
//! printed to stdout as one JSON line; logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! # Quote one applicant from a file (a JSON object, or an array of them)
//! cargo run --bin premium_prediction -- predict --input applicant.json
//!
//! # Read from stdin, skip the form's range/option checks
//! echo '{"age": 30, "insurance_plan": "Gold"}' | cargo run --bin premium_prediction -- predict --raw
//!
//! # Ten reproducible synthetic applicants, with per-quote debug output
//! RUST_LOG=debug cargo run --bin premium_prediction -- sample --count 10 --seed 42
//! ```

mod adapters;

use std::io::Write as _;
use std::path::PathBuf;

use adapters::artifact_store::{ArtifactError, ArtifactStoreConfig, load_artifacts};
use adapters::regression_model::RegressionModel;
use adapters::scaler_bundle::ScalerBundle;
use anyhow::Context as _;
use clap::{Parser, Subcommand};
use domain::{Cohort, RawInput};
use intake::{ApplicantGenerator, ApplicationForm, GeneratorConfig};
use modelizer::{Predictor, PredictorConfig};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncReadExt as _;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(about = "Predict health-insurance premiums from trained artifacts")]
struct Cli {
    /// Directory holding the model and scaler JSON files.
    #[arg(long, default_value = "artifacts")]
    artifacts: PathBuf,

    /// File name of the young-cohort model inside `--artifacts`.
    #[arg(long)]
    model_young: Option<String>,

    /// File name of the rest-cohort model inside `--artifacts`.
    #[arg(long)]
    model_rest: Option<String>,

    /// File name of the young-cohort scaler inside `--artifacts`.
    #[arg(long)]
    scaler_young: Option<String>,

    /// File name of the rest-cohort scaler inside `--artifacts`.
    #[arg(long)]
    scaler_rest: Option<String>,

    /// Applicants at or below this age use the young-cohort artifacts.
    #[arg(long, default_value_t = domain::DEFAULT_YOUNG_AGE_LIMIT)]
    young_age_limit: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Quote applicants read as JSON.
    Predict {
        /// Input file, or `-` for stdin.
        #[arg(long, default_value = "-")]
        input: String,
        /// Feed the input to the predictor as-is, without form validation.
        #[arg(long)]
        raw: bool,
    },
    /// Quote randomly generated applicants.
    Sample {
        /// Number of applicants.
        #[arg(long, default_value_t = 5)]
        count: usize,
        /// RNG seed for reproducible applicants.
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// One applicant or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Applicants {
    One(RawInput),
    Many(Vec<RawInput>),
}

/// A single line of output.
#[derive(Debug, Serialize)]
struct Quote<'a> {
    quote_id: Uuid,
    premium: i64,
    cohort: Cohort,
    #[serde(skip_serializing_if = "Option::is_none")]
    applicant: Option<&'a RawInput>,
}

type AppPredictor = Predictor<RegressionModel, ScalerBundle>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs on stderr keep stdout a clean JSON stream.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let predictor_config = PredictorConfig::builder()
        .young_age_limit(cli.young_age_limit)
        .build()
        .context("failed to build predictor config")?;
    let store_config = store_config(&cli).context("failed to build artifact store config")?;
    let artifacts = load_artifacts(&store_config)
        .await
        .with_context(|| format!("failed to load artifacts from {}", cli.artifacts.display()))?;
    let predictor = Predictor::new(predictor_config, artifacts);

    match cli.command {
        Command::Predict { input, raw } => {
            let applicants = read_applicants(&input).await?;
            for applicant in applicants {
                let applicant = if raw {
                    applicant
                } else {
                    ApplicationForm::from_raw_input(&applicant)
                        .context("applicant rejected by the form")?
                        .to_raw_input()
                };
                quote(&predictor, &applicant, false)?;
            }
        }
        Command::Sample { count, seed } => {
            let config = match seed {
                Some(seed) => GeneratorConfig::builder().seed(seed).build(),
                None => GeneratorConfig::builder().build(),
            };
            let applicants = ApplicantGenerator::new(config)
                .generate_batch(count)
                .context("failed to generate applicants")?;
            for applicant in &applicants {
                quote(&predictor, applicant, true)?;
            }
        }
    }

    Ok(())
}

/// Artifact locations from the command line; unset names keep their defaults.
fn store_config(cli: &Cli) -> Result<ArtifactStoreConfig, ArtifactError> {
    let mut builder = ArtifactStoreConfig::builder(&cli.artifacts);
    if let Some(name) = &cli.model_young {
        builder = builder.model_young(name);
    }
    if let Some(name) = &cli.model_rest {
        builder = builder.model_rest(name);
    }
    if let Some(name) = &cli.scaler_young {
        builder = builder.scaler_young(name);
    }
    if let Some(name) = &cli.scaler_rest {
        builder = builder.scaler_rest(name);
    }
    builder.build()
}

/// Read applicants from `source` (`-` is stdin).
async fn read_applicants(source: &str) -> anyhow::Result<Vec<RawInput>> {
    let text = if source == "-" {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await.context("failed to read stdin")?;
        text
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("failed to read {source}"))?
    };
    let applicants: Applicants =
        serde_json::from_str(&text).with_context(|| format!("failed to parse applicants from {source}"))?;
    Ok(match applicants {
        Applicants::One(applicant) => vec![applicant],
        Applicants::Many(applicants) => applicants,
    })
}

/// Predict one premium and print it as a JSON line.
fn quote(predictor: &AppPredictor, applicant: &RawInput, echo: bool) -> anyhow::Result<()> {
    let quote_id = Uuid::new_v4();
    let _span = tracing::info_span!("quote", %quote_id).entered();

    let prediction = predictor.predict(applicant).context("prediction failed")?;
    tracing::info!(premium = prediction.premium, cohort = %prediction.cohort, "main.quote");

    let line = serde_json::to_string(&Quote {
        quote_id,
        premium: prediction.premium,
        cohort: prediction.cohort,
        applicant: echo.then_some(applicant),
    })
    .context("failed to serialize quote")?;
    writeln!(std::io::stdout().lock(), "{line}").context("failed to write quote")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;
    use std::path::Path;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn artifact_file_names_default() {
        let cli = Cli::try_parse_from(["premium_prediction", "sample"]).unwrap();
        let cfg = store_config(&cli).unwrap();
        assert_eq!(cfg.model_path(Cohort::Young), Path::new("artifacts/model_young.json"));
        assert_eq!(cfg.scaler_path(Cohort::Rest), Path::new("artifacts/scaler_rest.json"));
    }

    #[test]
    fn artifact_file_names_from_flags() {
        let cli = Cli::try_parse_from([
            "premium_prediction",
            "--artifacts",
            "art",
            "--model-young",
            "young.json",
            "--scaler-rest",
            "rest_scaler.json",
            "predict",
            "--raw",
        ])
        .unwrap();
        let cfg = store_config(&cli).unwrap();
        assert_eq!(cfg.model_path(Cohort::Young), Path::new("art/young.json"));
        assert_eq!(cfg.model_path(Cohort::Rest), Path::new("art/model_rest.json"));
        assert_eq!(cfg.scaler_path(Cohort::Rest), Path::new("art/rest_scaler.json"));
        assert!(matches!(cli.command, Command::Predict { raw: true, ref input } if input == "-"));
    }

    #[test]
    fn empty_artifact_file_name_is_rejected() {
        let cli =
            Cli::try_parse_from(["premium_prediction", "--scaler-young", " ", "sample"]).unwrap();
        assert!(matches!(store_config(&cli), Err(ArtifactError::InvalidConfig { .. })));
    }

    #[tokio::test]
    async fn reads_single_and_batched_applicants() {
        let dir = tempfile::tempdir().unwrap();
        let one = dir.path().join("one.json");
        let many = dir.path().join("many.json");
        std::fs::write(&one, r#"{"age": 30, "gender": "Male"}"#).unwrap();
        std::fs::write(&many, r#"[{"age": 30}, {"age": 40}]"#).unwrap();
        assert_eq!(read_applicants(one.to_str().unwrap()).await.unwrap().len(), 1);
        assert_eq!(read_applicants(many.to_str().unwrap()).await.unwrap().len(), 2);
    }
}
