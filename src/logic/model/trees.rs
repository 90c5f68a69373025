//! Gradient-boosted decision trees (binary logistic objective)
//!
//! Node routing follows XGBoost: `x[feature] < threshold` goes left,
//! NaN follows `default_left`.

use serde::{Deserialize, Serialize};

use super::classifier::{normalize, sigmoid, Classifier, ClassifierFamily};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default)]
        default_left: bool,
        /// Loss reduction of the split, used for importance
        #[serde(default)]
        gain: f64,
    },
    Leaf {
        leaf: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    fn validate(&self, input_dim: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split { feature, threshold, left, right, .. } => {
                    if *feature >= input_dim {
                        return Err(format!(
                            "node {} splits on feature {} but input has {} features",
                            i, feature, input_dim
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has non-finite threshold", i));
                    }
                    // children strictly after the parent: no cycles, evaluation terminates
                    for child in [left, right] {
                        if *child <= i || *child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child index {}", i, child));
                        }
                    }
                }
                Node::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(format!("leaf {} has non-finite value", i));
                    }
                }
            }
        }
        Ok(())
    }

    fn eval(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { leaf } => return *leaf,
                Node::Split { feature, threshold, left, right, default_left, .. } => {
                    let x = features[*feature];
                    idx = if x.is_nan() {
                        if *default_left { *left } else { *right }
                    } else if x < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    /// Margin added before the trees (logit of the base score)
    #[serde(default)]
    pub base_margin: f64,
    pub trees: Vec<Tree>,
    #[serde(skip)]
    input_dim: usize,
}

impl GradientBoostedTrees {
    pub fn new(base_margin: f64, trees: Vec<Tree>) -> Self {
        Self { base_margin, trees, input_dim: 0 }
    }

    pub fn validate(&self, input_dim: usize) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("gradient boosted model has no trees".to_string());
        }
        if !self.base_margin.is_finite() {
            return Err("base_margin is not finite".to_string());
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(input_dim).map_err(|e| format!("tree {}: {}", t, e))?;
        }
        Ok(())
    }

    pub(crate) fn with_input_dim(mut self, input_dim: usize) -> Self {
        self.input_dim = input_dim;
        self
    }

    /// Raw additive score before the logistic link
    pub fn margin(&self, features: &[f64]) -> f64 {
        self.base_margin + self.trees.iter().map(|t| t.eval(features)).sum::<f64>()
    }
}

impl Classifier for GradientBoostedTrees {
    fn family(&self) -> ClassifierFamily {
        ClassifierFamily::GradientBoostedTrees
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn predict_proba(&self, features: &[f64]) -> f64 {
        sigmoid(self.margin(features))
    }

    /// Total split gain per feature (split count when gains were not exported)
    fn feature_importances(&self) -> Option<Vec<f64>> {
        let mut totals = vec![0.0; self.input_dim];
        for tree in &self.trees {
            for node in &tree.nodes {
                if let Node::Split { feature, gain, .. } = node {
                    totals[*feature] += if *gain > 0.0 { *gain } else { 1.0 };
                }
            }
        }
        Some(normalize(totals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, left: f64, right: f64, gain: f64) -> Tree {
        Tree {
            nodes: vec![
                Node::Split { feature, threshold, left: 1, right: 2, default_left: true, gain },
                Node::Leaf { leaf: left },
                Node::Leaf { leaf: right },
            ],
        }
    }

    fn model() -> GradientBoostedTrees {
        let model = GradientBoostedTrees::new(
            0.0,
            vec![stump(1, 2.0, 1.0, -2.0, 30.0), stump(0, 0.5, -0.5, 0.5, 10.0)],
        );
        model.validate(5).unwrap();
        model.with_input_dim(5)
    }

    #[test]
    fn test_routing() {
        let m = model();
        assert_eq!(m.margin(&[0.0, 0.0, 0.0, 0.0, 0.0]), 0.5);
        assert_eq!(m.margin(&[1.0, 3.0, 0.0, 0.0, 0.0]), -1.5);
        // threshold itself goes right
        assert_eq!(m.margin(&[0.5, 2.0, 0.0, 0.0, 0.0]), -1.5);
    }

    #[test]
    fn test_nan_follows_default() {
        let m = model();
        assert_eq!(m.margin(&[0.0, f64::NAN, 0.0, 0.0, 0.0]), 0.5);
    }

    #[test]
    fn test_probability_range_and_determinism() {
        let m = model();
        let x = [0.2, 5.0, 1.0, 1.0, 1.0];
        let p = m.predict_proba(&x);
        assert!((0.0..=1.0).contains(&p));
        assert_eq!(p.to_bits(), m.predict_proba(&x).to_bits());
    }

    #[test]
    fn test_gain_importance() {
        let importance = model().feature_importances().unwrap();
        assert_eq!(importance.len(), 5);
        assert!((importance[1] - 0.75).abs() < 1e-12);
        assert!((importance[0] - 0.25).abs() < 1e-12);
        assert_eq!(importance[4], 0.0);
    }

    #[test]
    fn test_validation_errors() {
        let out_of_range = GradientBoostedTrees::new(0.0, vec![stump(7, 1.0, 0.0, 0.0, 0.0)]);
        assert!(out_of_range.validate(5).is_err());

        let cycle = GradientBoostedTrees::new(
            0.0,
            vec![Tree {
                nodes: vec![Node::Split {
                    feature: 0,
                    threshold: 1.0,
                    left: 0,
                    right: 0,
                    default_left: false,
                    gain: 0.0,
                }],
            }],
        );
        assert!(cycle.validate(5).is_err());

        assert!(GradientBoostedTrees::new(0.0, vec![]).validate(5).is_err());
    }

    #[test]
    fn test_node_json_shapes() {
        let json = r#"{"nodes":[{"feature":1,"threshold":2.5,"left":1,"right":2},{"leaf":0.3},{"leaf":-0.3}]}"#;
        let tree: Tree = serde_json::from_str(json).unwrap();
        assert!(matches!(tree.nodes[0], Node::Split { feature: 1, default_left: false, .. }));
        assert!(matches!(tree.nodes[1], Node::Leaf { .. }));
    }
}
