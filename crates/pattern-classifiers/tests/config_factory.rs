mod common;

use ndarray::array;
use pattern_classifiers::config::{Algorithm, Kernel, ModelConfig, ModelType};
use pattern_classifiers::distance::DistanceMetric;
use pattern_classifiers::models::build_model;

use common::{gaussian_clusters, init_logger};

// ----------------------------------------------------------------------------
// Config
// ----------------------------------------------------------------------------

#[test]
fn model_config_round_trips_through_json() {
    let configs = vec![
        ModelConfig::default(),
        ModelConfig::new(ModelType::NaiveBayes {
            algorithm: Algorithm::Em,
            components: 3,
            iterations: 25,
        }),
        ModelConfig::new(ModelType::Knn {
            metric: DistanceMetric::Minkowski { p: 3.0 },
            k: 7,
        }),
        ModelConfig::new(ModelType::Parzen {
            kernel: Kernel::Gaussian,
            h: 0.25,
        }),
    ];
    for config in configs {
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ModelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.model_type, config.model_type);
        assert_eq!(parsed.seed, config.seed);
        assert_eq!(parsed.epsilon, config.epsilon);
    }
}

#[test]
fn model_config_rejects_invalid_minkowski_order() {
    let bad = r#"{"epsilon":1e-10,"seed":42,"Knn":{"metric":{"Minkowski":{"p":0.0}},"k":1}}"#;
    assert!(serde_json::from_str::<ModelConfig>(bad).is_err());

    let good = r#"{"epsilon":1e-10,"seed":42,"Knn":{"metric":{"Minkowski":{"p":2.0}},"k":1}}"#;
    let config: ModelConfig = serde_json::from_str(good).unwrap();
    let mut model = build_model::<i32>(&config);
    let x = array![[0.0, 0.0], [1.0, 1.0], [10.0, 10.0]];
    model.fit(x.view(), &[0, 0, 1]).unwrap();
    assert_eq!(model.predict(array![[10.0, 10.1]].view()).unwrap(), vec![1]);
}

#[test]
fn model_type_parses_from_name() {
    assert_eq!("bayes".parse::<ModelType>(), Ok(ModelType::default()));
    assert!(matches!("KNN".parse::<ModelType>(), Ok(ModelType::Knn { k: 5, .. })));
    assert!("svm".parse::<ModelType>().is_err());
}

// ----------------------------------------------------------------------------
// Factory
// ----------------------------------------------------------------------------

#[test]
fn factory_models_fit_and_predict() {
    init_logger();
    let (x, y) = gaussian_clusters(&[[0.0, 0.0], [8.0, 8.0]], 30, 1.0, 3);
    let model_types = vec![
        ModelType::default(),
        ModelType::Bayes {
            algorithm: Algorithm::Em,
            components: 2,
            iterations: 10,
            inverse: false,
        },
        ModelType::NaiveBayes {
            algorithm: Algorithm::Mle,
            components: 1,
            iterations: 1,
        },
        ModelType::Knn {
            metric: DistanceMetric::Euclidean,
            k: 3,
        },
        ModelType::Parzen {
            kernel: Kernel::Hypercube,
            h: 3.0,
        },
    ];

    for model_type in model_types {
        let mut model = build_model::<usize>(&ModelConfig::new(model_type));
        model.fit(x.view(), &y).unwrap();
        let pred = model.predict(array![[0.0, 0.0], [8.0, 8.0]].view()).unwrap();
        assert_eq!(pred, vec![0, 1], "{}", model.name());
    }
}
