//! CART (Classification and Regression Tree) builder
//!
//! Deterministic exact-greedy classification tree construction using Gini
//! impurity evaluated in fixed-point integer arithmetic.

use serde::{Deserialize, Serialize};

use crate::deterministic::SplitTieBreaker;
use crate::tree::{DecisionTree, Node};

/// Fixed-point scale for impurity comparisons
const IMPURITY_SCALE: i128 = 1_000_000;

/// Growth limits for a single tree
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

/// Split candidate with gain and tie-breaker
#[derive(Debug, Clone)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: i64,
    gain: i128,
    tie_breaker: SplitTieBreaker,
}

impl SplitCandidate {
    fn new(feature_idx: usize, threshold: i64, gain: i128, node_id: usize) -> Self {
        Self {
            feature_idx,
            threshold,
            gain,
            tie_breaker: SplitTieBreaker::new(feature_idx, threshold, node_id),
        }
    }

    fn beats(&self, other: &SplitCandidate) -> bool {
        self.gain > other.gain || (self.gain == other.gain && self.tie_breaker < other.tie_breaker)
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Samples still waiting for a node, plus the parent slot to patch
struct PendingNode {
    indices: Vec<usize>,
    depth: usize,
    parent: Option<(usize, Side)>,
}

enum Grown {
    Leaf(Node),
    Split {
        node: Node,
        left: Vec<usize>,
        right: Vec<usize>,
    },
}

/// Build a classification tree using exact-greedy CART
pub struct CartBuilder<'a> {
    config: TreeConfig,
    features: &'a [Vec<i64>],
    /// Dense class index per sample
    class_idx: Vec<usize>,
    /// Sorted distinct labels
    classes: Vec<i64>,
    feature_count: usize,
}

impl<'a> CartBuilder<'a> {
    /// # Panics
    ///
    /// Panics if `features` and `labels` differ in length. Callers validate
    /// shapes first (see [`crate::DecisionTreeClassifier`]).
    pub fn new(features: &'a [Vec<i64>], labels: &[i64], config: TreeConfig) -> Self {
        assert_eq!(features.len(), labels.len());

        let mut classes = labels.to_vec();
        classes.sort_unstable();
        classes.dedup();

        let class_idx = labels
            .iter()
            .map(|label| classes.binary_search(label).unwrap_or_default())
            .collect();

        let feature_count = features.first().map_or(0, Vec::len);

        Self {
            config,
            features,
            class_idx,
            classes,
            feature_count,
        }
    }

    /// Build tree and return it.
    ///
    /// Nodes are grown from an explicit work stack, so tree depth is bounded
    /// by memory rather than by the thread's call stack.
    pub fn build(&self) -> DecisionTree {
        let mut nodes: Vec<Node> = Vec::new();
        let mut pending = Vec::new();

        if !self.features.is_empty() {
            pending.push(PendingNode {
                indices: (0..self.features.len()).collect(),
                depth: 0,
                parent: None,
            });
        }

        while let Some(task) = pending.pop() {
            let current_idx = nodes.len() as i32;

            // Patch the reserved parent now that this child has a slot
            if let Some((parent, side)) = task.parent {
                let node = &mut nodes[parent];
                match side {
                    Side::Left => node.left = current_idx,
                    Side::Right => node.right = current_idx,
                }
            }

            match self.grow_node(&task.indices, task.depth, current_idx) {
                Grown::Leaf(leaf) => nodes.push(leaf),
                Grown::Split { node, left, right } => {
                    nodes.push(node);
                    let parent = current_idx as usize;
                    // Right is pushed first so the left subtree is emitted next (preorder)
                    pending.push(PendingNode {
                        indices: right,
                        depth: task.depth + 1,
                        parent: Some((parent, Side::Right)),
                    });
                    pending.push(PendingNode {
                        indices: left,
                        depth: task.depth + 1,
                        parent: Some((parent, Side::Left)),
                    });
                }
            }
        }

        DecisionTree::new(nodes, self.classes.clone(), self.feature_count)
    }

    /// Decide whether the samples at `current_idx` become a leaf or a split
    fn grow_node(&self, indices: &[usize], depth: usize, current_idx: i32) -> Grown {
        let counts = self.class_counts(indices);
        let leaf = Node::leaf(current_idx, self.majority_label(&counts)).with_samples(indices.len());

        let depth_exhausted = self.config.max_depth.is_some_and(|max| depth >= max);
        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;

        if depth_exhausted
            || pure
            || indices.len() < self.config.min_samples_split
            || indices.len() < 2 * self.config.min_samples_leaf
        {
            return Grown::Leaf(leaf);
        }

        let Some(split) = self.find_best_split(indices, &counts, current_idx as usize) else {
            return Grown::Leaf(leaf);
        };

        let (left, right) = self.split_samples(indices, split.feature_idx, split.threshold);

        // Children are patched in once they are emitted
        let node = Node::internal(current_idx, split.feature_idx as i32, split.threshold, -1, -1)
            .with_samples(indices.len());

        Grown::Split { node, left, right }
    }

    /// Sweep every feature in sorted order and keep the split with the
    /// largest impurity decrease.
    fn find_best_split(
        &self,
        indices: &[usize],
        parent_counts: &[usize],
        node_id: usize,
    ) -> Option<SplitCandidate> {
        let n = indices.len();
        let parent_impurity = weighted_gini(parent_counts, n);
        let mut best_split: Option<SplitCandidate> = None;

        for feature_idx in 0..self.feature_count {
            let mut order = indices.to_vec();
            order.sort_by_key(|&i| (self.features[i][feature_idx], i));

            let mut left_counts = vec![0usize; self.classes.len()];

            for pos in 0..n - 1 {
                let sample = order[pos];
                left_counts[self.class_idx[sample]] += 1;

                let value = self.features[sample][feature_idx];
                if value == self.features[order[pos + 1]][feature_idx] {
                    continue;
                }

                let n_left = pos + 1;
                let n_right = n - n_left;
                if n_left < self.config.min_samples_leaf || n_right < self.config.min_samples_leaf {
                    continue;
                }

                let right_counts: Vec<usize> = parent_counts
                    .iter()
                    .zip(&left_counts)
                    .map(|(parent, left)| parent - left)
                    .collect();

                let gain = parent_impurity
                    - weighted_gini(&left_counts, n_left)
                    - weighted_gini(&right_counts, n_right);

                let candidate = SplitCandidate::new(feature_idx, value, gain, node_id);

                best_split = match best_split {
                    Some(current) if !candidate.beats(&current) => Some(current),
                    _ => Some(candidate),
                };
            }
        }

        best_split
    }

    /// Split samples based on threshold
    fn split_samples(
        &self,
        indices: &[usize],
        feature_idx: usize,
        threshold: i64,
    ) -> (Vec<usize>, Vec<usize>) {
        indices
            .iter()
            .partition(|&&idx| self.features[idx][feature_idx] <= threshold)
    }

    fn class_counts(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.classes.len()];
        for &idx in indices {
            counts[self.class_idx[idx]] += 1;
        }
        counts
    }

    /// Most frequent class; ties go to the smallest label
    fn majority_label(&self, counts: &[usize]) -> i64 {
        let mut best = 0usize;
        for (class, &count) in counts.iter().enumerate() {
            if count > counts[best] {
                best = class;
            }
        }
        self.classes.get(best).copied().unwrap_or_default()
    }
}

/// `n * gini(counts)` at `IMPURITY_SCALE`: `SCALE * (n - sum(c^2) / n)`
fn weighted_gini(counts: &[usize], n: usize) -> i128 {
    if n == 0 {
        return 0;
    }
    let n = n as i128;
    let sum_sq: i128 = counts.iter().map(|&c| (c as i128) * (c as i128)).sum();
    IMPURITY_SCALE * n - (IMPURITY_SCALE * sum_sq) / n
}
