// Rust guideline compliant 2026-02-23

//! JSON model adapter for the `Regressor` port.
//!
//! Two model families are understood, tagged by `"kind"`:
//!
//! - `"linear"`: `intercept` plus one coefficient per schema column.
//! - `"gradient_boosted"`: `base_score` plus the sum of regression-tree
//!   leaves. Nodes are listed per tree; a split sends `x < threshold` left.
//!
//! Feature names are resolved against the schema once, at load time, so
//! prediction never looks anything up by name.

use std::collections::BTreeMap;

use domain::{COLUMN_COUNT, Column, FeatureVector, ModelError, Regressor};
use serde::Deserialize;

/// A model file that parsed but does not fit the feature schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelFormatError {
    /// A coefficient or split names a column the schema does not have.
    #[error("unknown feature `{name}`")]
    UnknownFeature {
        /// The unknown name.
        name: String,
    },
    /// A linear model lacks a coefficient for a schema column.
    #[error("no coefficient for `{column}`")]
    MissingCoefficient {
        /// The uncovered column.
        column: Column,
    },
    /// A tree has no nodes.
    #[error("tree {tree} is empty")]
    EmptyTree {
        /// Tree position.
        tree: usize,
    },
    /// A split points at itself, an earlier node, or past the end.
    #[error("tree {tree} node {node} has invalid child {child}")]
    InvalidChild {
        /// Tree position.
        tree: usize,
        /// Node position.
        node: usize,
        /// Offending child index.
        child: usize,
    },
}

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ModelFile {
    Linear {
        intercept: f64,
        coefficients: BTreeMap<String, f64>,
    },
    GradientBoosted {
        base_score: f64,
        trees: Vec<TreeFile>,
    },
}

#[derive(Debug, Deserialize)]
struct TreeFile {
    nodes: Vec<NodeFile>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum NodeFile {
    Split {
        feature: String,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

// ---------------------------------------------------------------------------
// RegressionModel
// ---------------------------------------------------------------------------

/// A trained regression model loaded from JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ModelFile")]
pub enum RegressionModel {
    /// `intercept + Σ weight·x`.
    Linear {
        /// Constant term.
        intercept: f64,
        /// One weight per schema column, in schema order.
        weights: [f64; COLUMN_COUNT],
    },
    /// `base_score + Σ tree(x)`.
    GradientBoosted {
        /// Constant term.
        base_score: f64,
        /// Validated trees.
        trees: Vec<Tree>,
    },
}

/// One regression tree. Node 0 is the root; children always follow parents.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Split { column: Column, threshold: f64, left: usize, right: usize },
    Leaf { value: f64 },
}

impl Tree {
    /// Walk from the root to a leaf.
    fn evaluate(&self, features: &FeatureVector) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split { column, threshold, left, right } => {
                    idx = if features[column] < threshold { left } else { right };
                }
            }
        }
    }
}

fn resolve(name: &str) -> Result<Column, ModelFormatError> {
    Column::from_name(name).ok_or_else(|| ModelFormatError::UnknownFeature { name: name.to_owned() })
}

impl TryFrom<ModelFile> for RegressionModel {
    type Error = ModelFormatError;

    fn try_from(file: ModelFile) -> Result<Self, Self::Error> {
        match file {
            ModelFile::Linear { intercept, coefficients } => {
                let mut weights = [None; COLUMN_COUNT];
                for (name, weight) in &coefficients {
                    weights[resolve(name)?.index()] = Some(*weight);
                }
                let mut dense = [0.0; COLUMN_COUNT];
                for (column, slot) in Column::ALL.into_iter().zip(weights) {
                    dense[column.index()] =
                        slot.ok_or(ModelFormatError::MissingCoefficient { column })?;
                }
                Ok(Self::Linear { intercept, weights: dense })
            }
            ModelFile::GradientBoosted { base_score, trees } => {
                let trees = trees
                    .into_iter()
                    .enumerate()
                    .map(|(tree, file)| build_tree(tree, file))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::GradientBoosted { base_score, trees })
            }
        }
    }
}

/// Children must point strictly forward, which also rules out cycles.
fn build_tree(tree: usize, file: TreeFile) -> Result<Tree, ModelFormatError> {
    if file.nodes.is_empty() {
        return Err(ModelFormatError::EmptyTree { tree });
    }
    let len = file.nodes.len();
    let nodes = file
        .nodes
        .into_iter()
        .enumerate()
        .map(|(node, n)| match n {
            NodeFile::Leaf { value } => Ok(Node::Leaf { value }),
            NodeFile::Split { feature, threshold, left, right } => {
                for child in [left, right] {
                    if child <= node || child >= len {
                        return Err(ModelFormatError::InvalidChild { tree, node, child });
                    }
                }
                Ok(Node::Split { column: resolve(&feature)?, threshold, left, right })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Tree { nodes })
}

impl Regressor for RegressionModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let value = match self {
            Self::Linear { intercept, weights } => {
                intercept + weights.iter().zip(features.as_slice()).map(|(w, x)| w * x).sum::<f64>()
            }
            Self::GradientBoosted { base_score, trees } => {
                base_score + trees.iter().map(|t| t.evaluate(features)).sum::<f64>()
            }
        };
        tracing::trace!(model = self.name(), value, "regression_model.predict");
        Ok(value)
    }

    fn name(&self) -> &str {
        match self {
            Self::Linear { .. } => "linear",
            Self::GradientBoosted { .. } => "gradient_boosted",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
