use super::*;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{Json, Router, http::StatusCode, routing::get};
use tokio::net::TcpListener;

async fn spawn_upstream() -> SocketAddr {
    let app = Router::new()
        .route(
            "/questions",
            get(|| async {
                Json(serde_json::json!([
                    {"id": 1, "Question": "What is 2+2?"},
                    {"id": 2, "Question": "<p>Name the capital of France</p>", "tags": ["geo"]}
                ]))
            }),
        )
        .route("/object", get(|| async { Json(serde_json::json!({"Question": "x"})) }))
        .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
        .route("/text", get(|| async { "not json" }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(serde_json::json!([]))
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn source(policy: DomainPolicy) -> HttpPoolSource {
    HttpPoolSource::new(policy, Duration::from_millis(500)).unwrap()
}

mod question_tests {
    use super::*;

    #[test]
    fn test_text_reads_named_field() {
        let q = Question::new(serde_json::json!({"Question": "What is 2+2?", "id": 7}));
        assert_eq!(q.text("Question"), Some("What is 2+2?"));
        assert_eq!(q.text("question"), None);
    }

    #[test]
    fn test_text_absent_for_non_strings_and_non_objects() {
        assert_eq!(Question::new(serde_json::json!({"Question": 5})).text("Question"), None);
        assert_eq!(Question::new(serde_json::json!("bare")).text("Question"), None);
        assert_eq!(Question::new(serde_json::Value::Null).text("Question"), None);
    }

    #[test]
    fn test_serializes_verbatim() {
        let record = serde_json::json!({"Question": "q", "meta": {"a": [1, 2]}});
        let q: Question = serde_json::from_value(record.clone()).unwrap();
        assert_eq!(serde_json::to_value(&q).unwrap(), record);
        assert_eq!(q.into_value(), record);
    }
}

mod policy_tests {
    use super::*;

    #[test]
    fn test_unrestricted_accepts_any_host() {
        let policy = DomainPolicy::allow_all();
        assert!(policy.is_unrestricted());
        assert!(policy.check("https://example.org/q.json").is_ok());
    }

    #[test]
    fn test_host_substring_match() {
        let policy = DomainPolicy::new(vec!["example.com".to_string()]);
        assert!(policy.check("https://api.example.com/questions").is_ok());
        assert!(matches!(
            policy.check("https://evil.org/?next=example.com"),
            Err(PoolError::DomainNotAllowed { host }) if host == "evil.org"
        ));
    }

    #[test]
    fn test_invalid_urls_rejected() {
        let policy = DomainPolicy::allow_all();
        assert!(matches!(
            policy.check("not a url"),
            Err(PoolError::InvalidUrl { .. })
        ));
        assert!(matches!(
            policy.check("file:///etc/passwd"),
            Err(PoolError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_source_exposes_its_policy() {
        let open = source(DomainPolicy::new(vec![]));
        assert!(open.policy().is_unrestricted());

        let restricted = source(DomainPolicy::new(vec!["quiz.test".to_string()]));
        assert!(!restricted.policy().is_unrestricted());
        assert_eq!(restricted.policy().allowed(), ["quiz.test".to_string()]);
    }
}

mod fetch_tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_returns_records_verbatim() {
        let addr = spawn_upstream().await;
        let pool = source(DomainPolicy::allow_all())
            .fetch(&format!("http://{}/questions", addr))
            .await
            .unwrap();

        assert_eq!(pool.len(), 2);
        assert_eq!(pool[0].text("Question"), Some("What is 2+2?"));
        assert_eq!(pool[1].as_value()["tags"], serde_json::json!(["geo"]));
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let addr = spawn_upstream().await;
        let err = source(DomainPolicy::allow_all())
            .fetch(&format!("http://{}/missing", addr))
            .await
            .unwrap_err();
        assert!(matches!(err, PoolError::Status { status: 404 }));
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_array_and_non_json() {
        let addr = spawn_upstream().await;
        let src = source(DomainPolicy::allow_all());

        let err = src.fetch(&format!("http://{}/object", addr)).await.unwrap_err();
        assert!(err.to_string().contains("an object"));

        let err = src.fetch(&format!("http://{}/text", addr)).await.unwrap_err();
        assert!(matches!(err, PoolError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let addr = spawn_upstream().await;
        let err = source(DomainPolicy::allow_all())
            .fetch(&format!("http://{}/slow", addr))
            .await
            .unwrap_err();
        assert!(matches!(err, PoolError::Request { .. }));
    }

    #[tokio::test]
    async fn test_fetch_applies_policy_before_network() {
        let err = source(DomainPolicy::new(vec!["questions.internal".to_string()]))
            .fetch("http://127.0.0.1:1/questions")
            .await
            .unwrap_err();
        assert!(matches!(err, PoolError::DomainNotAllowed { .. }));
    }

    #[tokio::test]
    async fn test_static_source() {
        let src = StaticPoolSource::new().with_texts("pool://a", &["one", "two"]);
        assert_eq!(src.fetch("pool://a").await.unwrap().len(), 2);
        assert!(matches!(
            src.fetch("pool://b").await,
            Err(PoolError::Status { status: 404 })
        ));
    }
}
