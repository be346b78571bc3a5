//! Decision tree classifier

use crate::error::{PredictorError, Result};
use ndarray::{Array1, Array2};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node holding class probabilities aligned with the tree's classes
    Leaf {
        distribution: Vec<f64>,
        n_samples: usize,
    },
    /// Internal node with split
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
        impurity: f64,
    },
}

/// Impurity criterion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Criterion {
    /// Gini impurity
    Gini,
    /// Shannon entropy
    Entropy,
}

/// Decision tree classifier model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Tree root
    root: Option<TreeNode>,
    /// Maximum depth
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Impurity criterion
    pub criterion: Criterion,
    /// Seed for the order in which features are scanned; ties between
    /// equally good splits go to the feature scanned first
    pub random_state: Option<u64>,
    /// Number of features
    n_features: usize,
    /// Feature importances
    feature_importances: Option<Array1<f64>>,
    /// Sorted distinct labels seen during fit
    classes: Vec<f64>,
}

/// Best split found for one node: (feature, threshold, impurity decrease)
type SplitCandidate = (usize, f64, f64);

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            criterion: Criterion::Gini,
            random_state: None,
            n_features: 0,
            feature_importances: None,
            classes: Vec::new(),
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples to split
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    /// Set minimum samples in leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    /// Set criterion
    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Seed the feature scan order
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Fit the tree to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(PredictorError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(PredictorError::ValidationError(
                "Need at least 1 sample to fit".to_string(),
            ));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(PredictorError::ValidationError(
                "Input contains NaN or infinity".to_string(),
            ));
        }

        let mut classes: Vec<f64> = y.iter().copied().collect();
        classes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        classes.dedup();
        self.classes = classes;
        self.n_features = n_features;

        let labels: Vec<usize> = y.iter().map(|v| self.class_index(*v)).collect();

        let mut feature_order: Vec<usize> = (0..n_features).collect();
        if let Some(seed) = self.random_state {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            feature_order.shuffle(&mut rng);
        }

        let mut importances = vec![0.0; n_features];
        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(self.build_tree(x, &labels, &indices, &feature_order, 0, &mut importances));

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(Array1::from_vec(importances));

        Ok(self)
    }

    fn class_index(&self, value: f64) -> usize {
        self.classes
            .iter()
            .position(|c| *c == value)
            .unwrap_or(0)
    }

    fn build_tree(
        &self,
        x: &Array2<f64>,
        labels: &[usize],
        indices: &[usize],
        feature_order: &[usize],
        depth: usize,
        importances: &mut [f64],
    ) -> TreeNode {
        let n_samples = indices.len();
        let counts = self.class_counts(labels, indices);
        let impurity = self.impurity(&counts, n_samples);

        let should_stop = n_samples < self.min_samples_split
            || n_samples < 2 * self.min_samples_leaf
            || self.max_depth.map_or(false, |d| depth >= d)
            || impurity <= f64::EPSILON;

        if should_stop {
            return self.leaf(&counts, n_samples);
        }

        let Some((feature_idx, threshold, gain)) =
            self.find_best_split(x, labels, indices, feature_order, &counts, impurity)
        else {
            return self.leaf(&counts, n_samples);
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| x[[i, feature_idx]] <= threshold);

        importances[feature_idx] += n_samples as f64 * gain;

        let left = Box::new(self.build_tree(x, labels, &left_indices, feature_order, depth + 1, importances));
        let right = Box::new(self.build_tree(x, labels, &right_indices, feature_order, depth + 1, importances));

        TreeNode::Split {
            feature_idx,
            threshold,
            left,
            right,
            n_samples,
            impurity,
        }
    }

    fn leaf(&self, counts: &[usize], n_samples: usize) -> TreeNode {
        let n = n_samples.max(1) as f64;
        TreeNode::Leaf {
            distribution: counts.iter().map(|&c| c as f64 / n).collect(),
            n_samples,
        }
    }

    fn class_counts(&self, labels: &[usize], indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.classes.len()];
        for &i in indices {
            counts[labels[i]] += 1;
        }
        counts
    }

    /// Scan features in `feature_order`, sweeping sorted values once per feature.
    /// Features are scanned in parallel; the first feature in scan order wins ties.
    fn find_best_split(
        &self,
        x: &Array2<f64>,
        labels: &[usize],
        indices: &[usize],
        feature_order: &[usize],
        parent_counts: &[usize],
        parent_impurity: f64,
    ) -> Option<SplitCandidate> {
        let n = indices.len();

        let feature_results: Vec<Option<SplitCandidate>> = feature_order
            .par_iter()
            .map(|&feature_idx| {
                let mut column: Vec<(f64, usize)> = indices
                    .iter()
                    .map(|&i| (x[[i, feature_idx]], labels[i]))
                    .collect();
                column.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

                let mut left_counts = vec![0usize; parent_counts.len()];
                let mut best: Option<SplitCandidate> = None;

                for pos in 0..n.saturating_sub(1) {
                    left_counts[column[pos].1] += 1;

                    let (value, next) = (column[pos].0, column[pos + 1].0);
                    if next <= value {
                        continue;
                    }

                    let left_n = pos + 1;
                    let right_n = n - left_n;
                    if left_n < self.min_samples_leaf || right_n < self.min_samples_leaf {
                        continue;
                    }

                    let right_counts: Vec<usize> = parent_counts
                        .iter()
                        .zip(&left_counts)
                        .map(|(p, l)| p - l)
                        .collect();

                    let weighted = (left_n as f64 * self.impurity(&left_counts, left_n)
                        + right_n as f64 * self.impurity(&right_counts, right_n))
                        / n as f64;
                    let gain = parent_impurity - weighted;

                    if best.map_or(true, |(_, _, g)| gain > g) {
                        let mut threshold = (value + next) / 2.0;
                        if threshold >= next || !threshold.is_finite() {
                            threshold = value;
                        }
                        best = Some((feature_idx, threshold, gain));
                    }
                }

                best
            })
            .collect();

        let mut best: Option<SplitCandidate> = None;
        for candidate in feature_results.into_iter().flatten() {
            if best.map_or(true, |(_, _, g)| candidate.2 > g) {
                best = Some(candidate);
            }
        }
        best
    }

    fn impurity(&self, counts: &[usize], n_samples: usize) -> f64 {
        if n_samples == 0 {
            return 0.0;
        }
        let n = n_samples as f64;
        match self.criterion {
            Criterion::Gini => {
                1.0 - counts
                    .iter()
                    .map(|&c| (c as f64 / n).powi(2))
                    .sum::<f64>()
            }
            Criterion::Entropy => -counts
                .iter()
                .filter(|&&c| c > 0)
                .map(|&c| {
                    let p = c as f64 / n;
                    p * p.log2()
                })
                .sum::<f64>(),
        }
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        let predictions = proba
            .rows()
            .into_iter()
            .map(|row| self.classes[argmax(&row.to_vec())])
            .collect();
        Ok(Array1::from_vec(predictions))
    }

    /// Class probabilities, one column per entry of [`DecisionTree::classes`]
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let root = self.root.as_ref().ok_or(PredictorError::ModelNotFitted)?;

        if x.ncols() != self.n_features {
            return Err(PredictorError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        let n_classes = self.classes.len();
        let mut proba = Array2::zeros((x.nrows(), n_classes));
        for (i, sample) in x.rows().into_iter().enumerate() {
            let distribution = Self::leaf_distribution(root, &sample.to_vec());
            for (j, p) in distribution.iter().enumerate() {
                proba[[i, j]] = *p;
            }
        }
        Ok(proba)
    }

    fn leaf_distribution<'a>(node: &'a TreeNode, sample: &[f64]) -> &'a [f64] {
        match node {
            TreeNode::Leaf { distribution, .. } => distribution,
            TreeNode::Split { feature_idx, threshold, left, right, .. } => {
                if sample[*feature_idx] <= *threshold {
                    Self::leaf_distribution(left, sample)
                } else {
                    Self::leaf_distribution(right, sample)
                }
            }
        }
    }

    /// Sorted class labels seen during fit
    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    /// Get tree depth (a lone leaf has depth 0)
    pub fn get_depth(&self) -> usize {
        match &self.root {
            None => 0,
            Some(node) => Self::node_depth(node),
        }
    }

    fn node_depth(node: &TreeNode) -> usize {
        match node {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => {
                1 + Self::node_depth(left).max(Self::node_depth(right))
            }
        }
    }

    /// Get number of leaves
    pub fn get_n_leaves(&self) -> usize {
        match &self.root {
            None => 0,
            Some(node) => Self::count_leaves(node),
        }
    }

    fn count_leaves(node: &TreeNode) -> usize {
        match node {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => {
                Self::count_leaves(left) + Self::count_leaves(right)
            }
        }
    }
}

/// Index of the first maximum
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
