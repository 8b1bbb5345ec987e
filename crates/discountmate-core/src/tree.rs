//! CART regression tree
//!
//! Greedy binary splits minimising the summed squared error of the two
//! children. Every feature is scanned exhaustively; candidate thresholds sit
//! halfway between consecutive distinct feature values. Nodes live in a flat
//! arena indexed by `usize`, the root is always node 0.
//!
//! A row goes left when `row[feature] <= threshold`.

use crate::basket::{Features, FEATURE_COUNT};
use crate::error::ModelError;
use crate::training::{Dataset, TrainingConfig};

/// Residual impurity below which a node is treated as pure
const PURE_EPSILON: f64 = 1e-12;

/// Stopping rules for tree growth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 4,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl From<&TrainingConfig> for TreeParams {
    fn from(config: &TrainingConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            min_samples_leaf: config.min_samples_leaf,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
        samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        samples: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    sse: f64,
}

/// Fitted regression tree
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Fit a tree to the dataset
    pub fn fit(data: &Dataset, params: &TreeParams) -> Result<Self, ModelError> {
        if data.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if data.features.len() != data.targets.len() {
            return Err(ModelError::DimensionMismatch {
                features: data.features.len(),
                targets: data.targets.len(),
            });
        }
        if params.min_samples_leaf == 0 {
            return Err(ModelError::InvalidParameter(
                "min_samples_leaf must be > 0".into(),
            ));
        }

        let mut builder = Builder {
            data,
            params: *params,
            nodes: Vec::new(),
        };
        builder.grow((0..data.len()).collect(), 0);

        Ok(Self {
            nodes: builder.nodes,
        })
    }

    /// Predict the target for one feature row
    pub fn predict(&self, row: &Features) -> f64 {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { value, .. } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    id = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Longest root-to-leaf path, in edges
    pub fn depth(&self) -> usize {
        self.depth_from(0)
    }

    fn depth_from(&self, id: usize) -> usize {
        match &self.nodes[id] {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => {
                1 + self.depth_from(*left).max(self.depth_from(*right))
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Samples that reached the root during training
    pub fn training_samples(&self) -> usize {
        match &self.nodes[0] {
            Node::Leaf { samples, .. } | Node::Split { samples, .. } => *samples,
        }
    }
}

struct Builder<'a> {
    data: &'a Dataset,
    params: TreeParams,
    nodes: Vec<Node>,
}

impl Builder<'_> {
    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let samples = indices.len();
        let (sum, sum_sq) = self.sums(&indices);
        let mean = sum / samples as f64;
        let node_sse = sum_sq - sum * sum / samples as f64;

        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: mean,
            samples,
        });

        if depth >= self.params.max_depth
            || samples < self.params.min_samples_split
            || samples < 2 * self.params.min_samples_leaf
            || node_sse <= PURE_EPSILON
        {
            return id;
        }

        let Some(split) = self.best_split(&indices) else {
            return id;
        };
        if node_sse - split.sse <= PURE_EPSILON {
            return id;
        }

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.data.features[i][split.feature] <= split.threshold);

        let left = self.grow(left_idx, depth + 1);
        let right = self.grow(right_idx, depth + 1);

        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
            samples,
        };
        id
    }

    fn sums(&self, indices: &[usize]) -> (f64, f64) {
        indices.iter().fold((0.0, 0.0), |(s, sq), &i| {
            let y = self.data.targets[i];
            (s + y, sq + y * y)
        })
    }

    fn best_split(&self, indices: &[usize]) -> Option<Split> {
        let (total_sum, total_sq) = self.sums(indices);
        let n = indices.len();
        let min_leaf = self.params.min_samples_leaf;
        let mut best: Option<Split> = None;

        let mut sorted = indices.to_vec();
        for feature in 0..FEATURE_COUNT {
            let x = |i: usize| self.data.features[i][feature];
            sorted.sort_by(|&a, &b| x(a).total_cmp(&x(b)));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for pos in 0..n - 1 {
                let y = self.data.targets[sorted[pos]];
                left_sum += y;
                left_sq += y * y;

                let left_n = pos + 1;
                let right_n = n - left_n;
                if left_n < min_leaf || right_n < min_leaf {
                    continue;
                }

                let lo = x(sorted[pos]);
                let hi = x(sorted[pos + 1]);
                if lo >= hi {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / left_n as f64)
                    + (right_sq - right_sum * right_sum / right_n as f64);

                if best.map_or(true, |b| sse < b.sse) {
                    let mid = lo + (hi - lo) / 2.0;
                    // midpoint can round up to `hi` for adjacent floats
                    let threshold = if mid < hi { mid } else { lo };
                    best = Some(Split {
                        feature,
                        threshold,
                        sse,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::synthetic_dataset;

    fn step_dataset() -> Dataset {
        // target jumps from 0.1 to 0.4 between total 10 and 20
        let features = vec![
            [5.0, 1.0, 0.0],
            [8.0, 1.0, 0.0],
            [10.0, 1.0, 0.0],
            [20.0, 1.0, 0.0],
            [25.0, 1.0, 0.0],
            [30.0, 1.0, 0.0],
        ];
        let targets = vec![0.1, 0.1, 0.1, 0.4, 0.4, 0.4];
        Dataset::new(features, targets).unwrap()
    }

    #[test]
    fn test_single_split_on_step() {
        let tree = RegressionTree::fit(&step_dataset(), &TreeParams::default()).unwrap();

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.training_samples(), 6);

        assert!((tree.predict(&[0.0, 1.0, 0.0]) - 0.1).abs() < 1e-12);
        assert!((tree.predict(&[15.0, 1.0, 0.0]) - 0.1).abs() < 1e-12);
        assert!((tree.predict(&[15.1, 1.0, 0.0]) - 0.4).abs() < 1e-12);
        assert!((tree.predict(&[1000.0, 1.0, 0.0]) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let data = Dataset::new(vec![[1.0, 1.0, 0.0], [2.0, 3.0, 1.0]], vec![0.2, 0.2]).unwrap();
        let tree = RegressionTree::fit(&data, &TreeParams::default()).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.depth(), 0);
        assert!((tree.predict(&[99.0, 99.0, 3.0]) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_identical_rows_cannot_split() {
        let data = Dataset::new(vec![[1.0, 1.0, 0.0], [1.0, 1.0, 0.0]], vec![0.0, 0.5]).unwrap();
        let tree = RegressionTree::fit(&data, &TreeParams::default()).unwrap();
        assert_eq!(tree.leaf_count(), 1);
        assert!((tree.predict(&[1.0, 1.0, 0.0]) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_min_samples_leaf_respected() {
        let params = TreeParams {
            min_samples_leaf: 4,
            ..Default::default()
        };
        // six rows cannot be split into two leaves of four
        let tree = RegressionTree::fit(&step_dataset(), &params).unwrap();
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn test_depth_is_bounded() {
        let config = TrainingConfig::default();
        let data = synthetic_dataset(&config).unwrap();
        for max_depth in 1..=6 {
            let params = TreeParams {
                max_depth,
                ..Default::default()
            };
            let tree = RegressionTree::fit(&data, &params).unwrap();
            assert!(tree.depth() <= max_depth);
            assert!(tree.leaf_count() <= 1 << max_depth);
            assert_eq!(tree.node_count(), 2 * tree.leaf_count() - 1);
        }
    }

    #[test]
    fn test_leaf_values_within_target_range() {
        let data = synthetic_dataset(&TrainingConfig::default()).unwrap();
        let tree = RegressionTree::fit(&data, &TreeParams::default()).unwrap();
        for row in &data.features {
            let y = tree.predict(row);
            assert!((0.0..=0.5).contains(&y));
        }
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let err = RegressionTree::fit(&Dataset::default(), &TreeParams::default()).unwrap_err();
        assert_eq!(err, ModelError::EmptyTrainingSet);
    }
}
