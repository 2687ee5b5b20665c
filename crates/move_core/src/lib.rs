//! Move classification core
//!
//! Integer-only building blocks shared by training and serving:
//!
//! - `sanitize`: decimal/hexadecimal feature token normalization
//! - `classifier`: the `Classifier` capability and its decision-tree implementation
//! - `cart`: deterministic Gini CART tree construction
//! - `tree`: serializable decision tree model and traversal
//! - `metrics`: accuracy and confusion matrix
//! - `deterministic`: seeded LCG and split tie-breaking
//! - `serde_canon`: canonical JSON and BLAKE3 model hashing

pub mod cart;
pub mod classifier;
pub mod deterministic;
pub mod errors;
pub mod metrics;
pub mod sanitize;
pub mod serde_canon;
pub mod tree;

pub use cart::{CartBuilder, TreeConfig};
pub use classifier::{Classifier, DecisionTreeClassifier};
pub use deterministic::{LcgRng, SplitTieBreaker};
pub use errors::ClassifierError;
pub use metrics::{accuracy, ConfusionMatrix, MetricsError};
pub use sanitize::{sanitize_row, sanitize_token, SanitizeError, FEATURE_COUNT};
pub use tree::{DecisionTree, Node};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
