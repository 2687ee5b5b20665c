//! Reproducible 50/50 fold partition

use ttt_move_core::LcgRng;

use crate::errors::TrainerError;

/// Row indices of the two cross-validation folds.
///
/// Fold A receives `floor(n / 2)` rows and Fold B the remaining
/// `ceil(n / 2)`, so the evaluation half of the first round is never smaller
/// than its training half.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoldSplit {
    fold_a: Vec<usize>,
    fold_b: Vec<usize>,
}

impl FoldSplit {
    /// Draw the permutation once from `seed`; `shuffle = false` keeps
    /// dataset order.
    pub fn new(rows: usize, seed: i64, shuffle: bool) -> Result<Self, TrainerError> {
        if rows < 2 {
            return Err(TrainerError::InsufficientData { rows });
        }

        let mut order: Vec<usize> = (0..rows).collect();
        if shuffle {
            LcgRng::new(seed).shuffle(&mut order);
        }

        let fold_b = order.split_off(rows / 2);
        Ok(Self {
            fold_a: order,
            fold_b,
        })
    }

    pub fn fold_a(&self) -> &[usize] {
        &self.fold_a
    }

    pub fn fold_b(&self) -> &[usize] {
        &self.fold_b
    }
}
