//! K-fold cross-validation splitter

use crate::domain::errors::EvaluationError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// A single train/test split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldSplit {
    pub fold: usize,
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// K-fold splitter. Each sample lands in exactly one test fold.
#[derive(Debug, Clone, Copy)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    seed: Option<u64>,
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: false,
            seed: None,
        }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Seed for the shuffle; without one the order comes from OS entropy.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Splits `0..n_samples` into `n_splits` folds.
    ///
    /// The first `n_samples % n_splits` folds hold one extra test sample.
    /// Index lists within a split are sorted ascending.
    pub fn split(&self, n_samples: usize) -> Result<Vec<FoldSplit>, EvaluationError> {
        if self.n_splits < 2 {
            return Err(EvaluationError::InvalidFolds {
                folds: self.n_splits,
            });
        }
        if n_samples < self.n_splits {
            return Err(EvaluationError::NotEnoughSamples {
                samples: n_samples,
                folds: self.n_splits,
            });
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            let mut rng = match self.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            indices.shuffle(&mut rng);
        }

        let base = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut splits = Vec::with_capacity(self.n_splits);
        let mut current = 0;

        for fold in 0..self.n_splits {
            let fold_size = if fold < remainder { base + 1 } else { base };

            let mut test: Vec<usize> = indices[current..current + fold_size].to_vec();
            let mut train: Vec<usize> = indices[..current]
                .iter()
                .chain(indices[current + fold_size..].iter())
                .copied()
                .collect();
            test.sort_unstable();
            train.sort_unstable();

            splits.push(FoldSplit { fold, train, test });
            current += fold_size;
        }

        Ok(splits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_sizes_and_partition() {
        let splits = KFold::new(3).split(10).unwrap();
        let sizes: Vec<usize> = splits.iter().map(|s| s.test.len()).collect();
        assert_eq!(sizes, vec![4, 3, 3]);

        let mut all_test: Vec<usize> = splits.iter().flat_map(|s| s.test.clone()).collect();
        all_test.sort_unstable();
        assert_eq!(all_test, (0..10).collect::<Vec<_>>());

        for split in &splits {
            assert_eq!(split.train.len() + split.test.len(), 10);
            assert!(split.test.iter().all(|i| !split.train.contains(i)));
        }
    }

    #[test]
    fn test_unshuffled_folds_are_contiguous() {
        let splits = KFold::new(2).split(4).unwrap();
        assert_eq!(splits[0].test, vec![0, 1]);
        assert_eq!(splits[1].test, vec![2, 3]);
        assert_eq!(splits[1].train, vec![0, 1]);
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let kfold = KFold::new(5).with_shuffle(true).with_seed(Some(42));
        let a = kfold.split(50).unwrap();
        let b = kfold.split(50).unwrap();
        assert_eq!(a, b);

        let other = KFold::new(5).with_shuffle(true).with_seed(Some(43)).split(50).unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn test_invalid_configurations() {
        assert!(matches!(
            KFold::new(1).split(10),
            Err(EvaluationError::InvalidFolds { folds: 1 })
        ));
        assert!(matches!(
            KFold::new(5).split(3),
            Err(EvaluationError::NotEnoughSamples {
                samples: 3,
                folds: 5
            })
        ));
    }
}
