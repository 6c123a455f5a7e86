//! Class label bookkeeping shared by every classifier.
//!
//! A `LabelSet` fixes the order of the classes observed at fit time. That order
//! indexes the per-class model parameters and decides every tie in an argmax or
//! a vote: the class that appeared first in the training labels wins.
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::ClassifierError;

/// Anything usable as a class label.
pub trait Label: Clone + Eq + Hash + Debug {}

impl<T> Label for T where T: Clone + Eq + Hash + Debug {}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelSet<L: Label> {
    labels: Vec<L>,
    index: HashMap<L, usize>,
}

impl<L: Label> LabelSet<L> {
    /// Collects the distinct labels of `y` in order of first appearance.
    pub fn from_labels(y: &[L]) -> Self {
        let mut labels = Vec::new();
        let mut index = HashMap::new();
        for label in y {
            if !index.contains_key(label) {
                index.insert(label.clone(), labels.len());
                labels.push(label.clone());
            }
        }
        Self { labels, index }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, idx: usize) -> &L {
        &self.labels[idx]
    }

    pub fn index_of(&self, label: &L) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, L> {
        self.labels.iter()
    }

    pub fn as_slice(&self) -> &[L] {
        &self.labels
    }

    /// Maps each label of `y` to its class index. Labels outside the set are
    /// reported as `None`.
    pub fn encode(&self, y: &[L]) -> Vec<Option<usize>> {
        y.iter().map(|label| self.index_of(label)).collect()
    }

    /// Sample rows belonging to each class, in class order.
    pub fn partition(&self, y: &[L]) -> Vec<Vec<usize>> {
        let mut rows = vec![Vec::new(); self.len()];
        for (row, label) in y.iter().enumerate() {
            if let Some(idx) = self.index_of(label) {
                rows[idx].push(row);
            }
        }
        rows
    }

    pub fn decode(&self, indices: &[usize]) -> Vec<L> {
        indices.iter().map(|&idx| self.labels[idx].clone()).collect()
    }
}

/// Number of mixture components to fit for each class.
#[derive(Clone, Debug, PartialEq)]
pub enum Components<L: Label> {
    /// The same count for every class.
    Uniform(usize),
    PerClass(HashMap<L, usize>),
}

impl<L: Label> Components<L> {
    pub fn for_class(&self, label: &L) -> Result<usize, ClassifierError> {
        match self {
            Components::Uniform(k) => Ok(*k),
            Components::PerClass(map) => map
                .get(label)
                .copied()
                .ok_or_else(|| ClassifierError::MissingComponents(format!("{:?}", label))),
        }
    }
}

impl<L: Label> From<usize> for Components<L> {
    fn from(k: usize) -> Self {
        Components::Uniform(k)
    }
}

impl<L: Label> From<HashMap<L, usize>> for Components<L> {
    fn from(map: HashMap<L, usize>) -> Self {
        Components::PerClass(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_order_is_first_appearance() {
        let set = LabelSet::from_labels(&["b", "a", "b", "c", "a"]);
        assert_eq!(set.as_slice(), &["b", "a", "c"]);
        assert_eq!(set.index_of(&"c"), Some(2));
        assert_eq!(set.index_of(&"z"), None);
    }

    #[test]
    fn partition_groups_rows_by_class() {
        let y = [1, 0, 1, 1, 0];
        let set = LabelSet::from_labels(&y);
        assert_eq!(set.partition(&y), vec![vec![0, 2, 3], vec![1, 4]]);
        assert_eq!(set.decode(&[1, 0]), vec![0, 1]);
    }

    #[test]
    fn per_class_components_report_missing_class() {
        let mut map = HashMap::new();
        map.insert("cat", 2);
        let components = Components::from(map);
        assert_eq!(components.for_class(&"cat"), Ok(2));
        assert!(matches!(
            components.for_class(&"dog"),
            Err(ClassifierError::MissingComponents(_))
        ));
        assert_eq!(Components::<&str>::Uniform(3).for_class(&"dog"), Ok(3));
    }
}
