//! Seeded train/test split

use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{PredictorError, Result};

/// Rows partitioned into a fitting set and a held-out scoring set
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
}

/// Shuffle row indices with a seeded RNG and hold out `ceil(n * test_size)` rows.
///
/// The same inputs and seed always produce the same partitions.
pub fn train_test_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    test_size: f64,
    seed: u64,
) -> Result<TrainTestSplit> {
    let n = x.nrows();
    if n != y.len() {
        return Err(PredictorError::ShapeError {
            expected: format!("y length = {}", n),
            actual: format!("y length = {}", y.len()),
        });
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PredictorError::ValidationError(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = (n as f64 * test_size).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(PredictorError::ValidationError(format!(
            "With n_samples={}, test_size={} the resulting train set will be empty",
            n, test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);

    Ok(TrainTestSplit {
        x_train: x.select(Axis(0), train_idx),
        x_test: x.select(Axis(0), test_idx),
        y_train: y.select(Axis(0), train_idx),
        y_test: y.select(Axis(0), test_idx),
    })
}
