pub mod bayes;
pub mod knn;
pub mod naive_bayes;
pub mod parzen;
pub mod utils;

pub mod classifier_trait;
pub mod factory;

pub use bayes::{BayesClassifier, ClassProfile};
pub use classifier_trait::ClassifierModel;
pub use factory::build_model;
pub use knn::{KnnClassifier, KnnModel};
pub use naive_bayes::{NaiveBayesClassifier, NaiveClassProfile};
pub use parzen::ParzenWindow;
