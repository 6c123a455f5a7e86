use crate::config::{ModelConfig, ModelType};
use crate::labels::Label;
use crate::models::bayes::BayesClassifier;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::knn::{KnnClassifier, KnnModel};
use crate::models::naive_bayes::NaiveBayesClassifier;
use crate::models::parzen::ParzenWindow;

/// Build a boxed classifier model from a `ModelConfig`.
pub fn build_model<L: Label + 'static>(config: &ModelConfig) -> Box<dyn ClassifierModel<L>> {
    match config.model_type {
        ModelType::Bayes { components, .. } => {
            let em = config.em_config().unwrap_or_default();
            Box::new(BayesClassifier::with_config(em).with_components(components))
        }
        ModelType::NaiveBayes { components, .. } => {
            let em = config.em_config().unwrap_or_default();
            Box::new(NaiveBayesClassifier::with_config(em).with_components(components))
        }
        ModelType::Knn { metric, k } => Box::new(KnnModel::new(KnnClassifier::new(metric), k)),
        ModelType::Parzen { kernel, h } => Box::new(ParzenWindow::new(h, kernel)),
    }
}
