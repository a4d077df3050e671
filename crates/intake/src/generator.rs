// Rust guideline compliant 2026-02-23

//! Random applicant generation for demos, benchmarks, and property tests.

use std::cell::RefCell;

use domain::RawInput;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{ApplicationForm, CATEGORICAL_FIELDS, DERIVED_FIELD, FormError, NUMERIC_FIELDS};

// ---------------------------------------------------------------------------
// GeneratorConfig + builder
// ---------------------------------------------------------------------------

/// Runtime configuration for an [`ApplicantGenerator`].
///
/// Construct via [`GeneratorConfig::builder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratorConfig {
    /// Optional RNG seed for reproducible applicants. `None` seeds from the OS.
    pub seed: Option<u64>,
}

/// Builder for [`GeneratorConfig`].
///
/// Obtain via [`GeneratorConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct GeneratorConfigBuilder {
    seed: Option<u64>,
}

impl GeneratorConfig {
    /// Create a builder. Default: OS-seeded.
    #[must_use]
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder { seed: None }
    }
}

impl GeneratorConfigBuilder {
    /// Fix the RNG seed for deterministic output (useful in tests).
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> GeneratorConfig {
        GeneratorConfig { seed: self.seed }
    }
}

// ---------------------------------------------------------------------------
// ApplicantGenerator
// ---------------------------------------------------------------------------

/// Generates random applicants that the form would accept.
#[derive(Debug)]
pub struct ApplicantGenerator {
    /// Interior mutability required because all public methods take `&self`.
    rng: RefCell<StdRng>,
}

impl ApplicantGenerator {
    /// Create a new generator from `config`.
    ///
    /// Seeds the RNG from `config.seed` if set, otherwise from the OS.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng: RefCell::new(rng) }
    }

    /// Fill a form with uniformly drawn values.
    ///
    /// Every numeric field is drawn from its full range, every categorical
    /// field from its options; `income_level` is derived as usual.
    ///
    /// # Errors
    ///
    /// Only fails if the catalog itself is inconsistent.
    pub fn generate_form(&self) -> Result<ApplicationForm, FormError> {
        let mut rng = self.rng.borrow_mut();
        let mut form = ApplicationForm::new();
        for field in &NUMERIC_FIELDS {
            let steps = (field.max - field.min) / field.step;
            let value = field.min + rng.random_range(0..=steps) * field.step;
            form.set_number(field.name, f64::from(value))?;
        }
        for field in CATEGORICAL_FIELDS.iter().filter(|f| f.name != DERIVED_FIELD) {
            // Index is always in bounds: derived from len().
            let idx = rng.random_range(0..field.options.len());
            form.set_choice(field.name, field.options[idx])?;
        }
        Ok(form)
    }

    /// Generate one submitted applicant.
    ///
    /// # Errors
    ///
    /// See [`generate_form`](Self::generate_form).
    pub fn generate(&self) -> Result<RawInput, FormError> {
        self.generate_form().map(|form| form.to_raw_input())
    }

    /// Generate `count` applicants.
    ///
    /// # Errors
    ///
    /// See [`generate_form`](Self::generate_form).
    pub fn generate_batch(&self, count: usize) -> Result<Vec<RawInput>, FormError> {
        let batch = (0..count).map(|_| self.generate()).collect::<Result<Vec<_>, _>>()?;
        log::debug!("intake.generator.batch: size={}", batch.len());
        Ok(batch)
    }
}
