use super::*;
use crate::embedding::MockEmbedder;

const TIMEOUT: Duration = Duration::from_secs(5);

fn arithmetic_embedder() -> MockEmbedder {
    MockEmbedder::new(3)
        .with_vector("What is 2+2?", vec![0.9, 0.1, 0.0])
        .with_vector("Compute 2 plus 2", vec![0.8, 0.2, 0.0])
        .with_vector("Name the capital of France", vec![0.0, 0.1, 0.9])
        .with_vector("What's the sum of 2 and 2?", vec![1.0, 0.1, 0.0])
}

#[test]
fn test_resolve_is_one_based() {
    let shortlist = Shortlist::new(vec![
        ShortlistEntry {
            position: PoolPosition::new(7),
            score: 0.9,
        },
        ShortlistEntry {
            position: PoolPosition::new(2),
            score: 0.5,
        },
    ]);

    assert!(shortlist.resolve(0).is_none());
    assert_eq!(shortlist.resolve(1).unwrap().position, PoolPosition::new(7));
    assert_eq!(shortlist.resolve(2).unwrap().position, PoolPosition::new(2));
    assert!(shortlist.resolve(3).is_none());
}

#[tokio::test]
async fn test_shortlist_ranks_paraphrases_first() {
    let embedder = arithmetic_embedder();
    let pool = ["What is 2+2?", "Compute 2 plus 2", "Name the capital of France"];

    let shortlist = ShortlistBuilder::new(&embedder, 5, TIMEOUT)
        .build(&pool, "What's the sum of 2 and 2?")
        .await
        .unwrap();

    assert_eq!(shortlist.len(), 3);
    let positions: Vec<usize> = shortlist.iter().map(|e| e.position.get()).collect();
    assert_eq!(positions[2], 2);
    assert!(positions[..2].contains(&0) && positions[..2].contains(&1));
    assert_eq!(embedder.call_count(), 2);
}

#[tokio::test]
async fn test_positions_refer_to_pool_not_rank() {
    let embedder = MockEmbedder::new(2)
        .with_vector("far", vec![0.0, 1.0])
        .with_vector("near", vec![1.0, 0.0])
        .with_vector("query", vec![1.0, 0.05]);

    let shortlist = ShortlistBuilder::new(&embedder, 1, TIMEOUT)
        .build(&["far", "far", "far", "near"], "query")
        .await
        .unwrap();

    assert_eq!(shortlist.len(), 1);
    assert_eq!(shortlist.resolve(1).unwrap().position, PoolPosition::new(3));
}

#[tokio::test]
async fn test_markup_is_stripped_before_embedding() {
    let embedder = MockEmbedder::new(2)
        .with_vector("What is 2+2?", vec![1.0, 0.0])
        .with_vector("Other", vec![0.0, 1.0])
        .with_vector("2+2", vec![1.0, 0.0]);

    let shortlist = ShortlistBuilder::new(&embedder, 2, TIMEOUT)
        .build(&["<p>Other</p>", "<p>What is <b>2+2</b>?</p>"], "<i>2+2</i>")
        .await
        .unwrap();

    assert_eq!(shortlist.resolve(1).unwrap().position, PoolPosition::new(1));
    assert!((shortlist.resolve(1).unwrap().score - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_empty_pool_fails_without_embedding() {
    let embedder = MockEmbedder::new(3);
    let err = ShortlistBuilder::new(&embedder, 5, TIMEOUT)
        .build(&[], "anything")
        .await
        .unwrap_err();

    assert!(matches!(err, ShortlistError::Build(IndexError::EmptyPool)));
    assert_eq!(embedder.call_count(), 0);
}

#[tokio::test]
async fn test_zero_k_fails_at_search() {
    let embedder = MockEmbedder::new(3);
    let err = ShortlistBuilder::new(&embedder, 0, TIMEOUT)
        .build(&["a", "b"], "c")
        .await
        .unwrap_err();

    assert!(matches!(err, ShortlistError::Search(IndexError::InvalidK)));
    assert_eq!(embedder.call_count(), 2);
}

#[tokio::test]
async fn test_embedding_failure_reports_target() {
    let embedder = MockEmbedder::new(3).unavailable();
    let err = ShortlistBuilder::new(&embedder, 5, TIMEOUT)
        .build(&["a"], "b")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ShortlistError::Embedding {
            target: EmbedTarget::Pool,
            source: EmbeddingError::Unavailable { .. }
        }
    ));
}

#[tokio::test]
async fn test_malformed_embedding_output_rejected() {
    let embedder = MockEmbedder::new(3).dropping_last();
    let err = ShortlistBuilder::new(&embedder, 5, TIMEOUT)
        .build(&["a", "b"], "c")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ShortlistError::Embedding {
            source: EmbeddingError::MalformedOutput { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_empty_vectors_rejected() {
    let embedder = MockEmbedder::new(3).returning_empty_vectors();
    let err = ShortlistBuilder::new(&embedder, 5, TIMEOUT)
        .build(&["a"], "b")
        .await
        .unwrap_err();

    assert!(matches!(err, ShortlistError::Embedding { .. }));
}

#[tokio::test]
async fn test_slow_embedder_times_out() {
    let embedder = MockEmbedder::new(3).with_delay(Duration::from_secs(10));
    let err = ShortlistBuilder::new(&embedder, 5, Duration::from_millis(50))
        .build(&["a"], "b")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ShortlistError::Timeout {
            target: EmbedTarget::Pool,
            ..
        }
    ));
}
