use super::*;
use std::path::PathBuf;

mod config_tests {
    use super::*;

    #[test]
    fn test_sentence_config_default() {
        let config = SentenceConfig::default();
        assert_eq!(config.embedding_dim, SENTENCE_EMBEDDING_DIM);
        assert_eq!(config.max_seq_len, SENTENCE_MAX_SEQ_LEN);
        assert!(!config.testing_stub);
        assert!(config.model_dir.as_os_str().is_empty());
    }

    #[test]
    fn test_sentence_config_new() {
        let config = SentenceConfig::new("/models/all-MiniLM-L6-v2");
        assert_eq!(config.model_dir, PathBuf::from("/models/all-MiniLM-L6-v2"));
        assert!(!config.testing_stub);
    }

    #[test]
    fn test_sentence_config_stub_validates() {
        let config = SentenceConfig::stub();
        assert!(config.testing_stub);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_dir_without_stub() {
        let config = SentenceConfig::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidConfig { .. }));
    }

    #[test]
    fn test_validation_missing_dir() {
        let config = SentenceConfig::new("/nonexistent/minilm");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, EmbeddingError::ModelNotFound { .. }));
    }

    #[test]
    fn test_validation_reports_missing_model_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("config.json"), "{}").expect("write config");

        let config = SentenceConfig::new(dir.path());
        assert_eq!(
            config.missing_files(),
            vec!["model.safetensors", "tokenizer.json"]
        );

        match config.validate() {
            Err(EmbeddingError::ModelNotFound { path }) => {
                assert!(path.ends_with("model.safetensors"));
            }
            other => panic!("expected ModelNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_zero_dimension() {
        let config = SentenceConfig::stub().with_embedding_dim(0);
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::InvalidConfig { .. })
        ));
    }
}

mod stub_tests {
    use super::*;

    fn stub() -> SentenceEmbedder {
        SentenceEmbedder::load(SentenceConfig::stub()).expect("stub should load")
    }

    #[test]
    fn test_stub_reports_mode_and_dim() {
        let embedder = stub();
        assert!(embedder.is_stub());
        assert_eq!(embedder.embedding_dim(), SENTENCE_EMBEDDING_DIM);
        assert_eq!(embedder.device_label(), "cpu");
        assert!(format!("{:?}", embedder).contains("Stub"));
    }

    #[test]
    fn test_stub_is_deterministic() {
        let embedder = stub();
        let first = embedder.embed_batch(&["What is 2+2?"]).expect("embed");
        let second = embedder.embed_batch(&["What is 2+2?"]).expect("embed");
        assert_eq!(first, second);
    }

    #[test]
    fn test_stub_distinguishes_texts() {
        let embedder = stub();
        let out = embedder
            .embed_batch(&["What is 2+2?", "Name the capital of France"])
            .expect("embed");
        assert_eq!(out.len(), 2);
        assert_ne!(out[0], out[1]);
    }

    #[test]
    fn test_stub_vectors_are_unit_length() {
        let embedder = stub();
        let out = embedder.embed_batch(&["", "hello"]).expect("embed");
        for v in out {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-4, "norm = {}", norm);
        }
    }

    #[test]
    fn test_stub_custom_dimension() {
        let embedder = SentenceEmbedder::load(SentenceConfig::stub().with_embedding_dim(16))
            .expect("stub should load");
        let out = embedder.embed_batch(&["a", "b", "c"]).expect("embed");
        assert!(out.iter().all(|v| v.len() == 16));
    }

    #[test]
    fn test_empty_batch() {
        let embedder = stub();
        assert!(embedder.embed_batch(&[]).expect("embed").is_empty());
    }

    #[tokio::test]
    async fn test_trait_embed_preserves_order() {
        let embedder = stub();
        let texts = vec!["one".to_string(), "two".to_string(), "three".to_string()];

        let batch = Embedder::embed(&embedder, &texts).await.expect("embed");
        for (text, vector) in texts.iter().zip(&batch) {
            assert_eq!(vector, &stub_vector(text, SENTENCE_EMBEDDING_DIM));
        }
    }

    #[test]
    fn test_l2_normalize_leaves_zero_vector() {
        assert_eq!(l2_normalize(vec![0.0, 0.0]), vec![0.0, 0.0]);
        let v = l2_normalize(vec![3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6 && (v[1] - 0.8).abs() < 1e-6);
    }
}

fn model_dir_from_env() -> PathBuf {
    std::env::var("SEMDEDUP_TEST_MODEL_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/models/all-MiniLM-L6-v2"))
}

/// Integration test for full transformer inference.
/// Run with: cargo test --lib sentence -- --ignored
#[test]
#[ignore]
fn test_sentence_transformer_normalized_output() {
    let embedder =
        SentenceEmbedder::load(SentenceConfig::new(model_dir_from_env())).expect("Should load");
    assert!(!embedder.is_stub());

    let out = embedder
        .embed_batch(&["Test sentence", "A much longer test sentence to force padding"])
        .expect("Should embed");

    for v in out {
        assert_eq!(v.len(), embedder.embedding_dim());
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.01, "norm = {}", norm);
    }
}

#[test]
#[ignore]
fn test_sentence_transformer_padding_does_not_change_embedding() {
    let embedder =
        SentenceEmbedder::load(SentenceConfig::new(model_dir_from_env())).expect("Should load");

    let alone = embedder.embed_batch(&["What is 2+2?"]).expect("embed");
    let padded = embedder
        .embed_batch(&["What is 2+2?", "A considerably longer neighbour in the same batch"])
        .expect("embed");

    let dot: f32 = alone[0].iter().zip(&padded[0]).map(|(a, b)| a * b).sum();
    assert!(dot > 0.999, "padding changed the embedding: cos = {}", dot);
}

#[test]
#[ignore]
fn test_sentence_transformer_semantic_similarity() {
    let embedder =
        SentenceEmbedder::load(SentenceConfig::new(model_dir_from_env())).expect("Should load");

    let out = embedder
        .embed_batch(&[
            "What is 2+2?",
            "What's the sum of 2 and 2?",
            "Name the capital of France",
        ])
        .expect("embed");

    let cos = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };

    assert!(
        cos(&out[0], &out[1]) > cos(&out[0], &out[2]),
        "paraphrases should be closer than unrelated questions"
    );
}
