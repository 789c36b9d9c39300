//! Integration tests for the generation layer — rotation, timeout, and
//! fallback working together without any external provider.
//!
//! All tests are pure and deterministic: the backend is scripted per
//! (key, model) pair, so every rotation path can be pinned down exactly.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mitra_domain::error::{Error, Result};
use mitra_providers::{CredentialRotator, GenerationClient, TextGenerator};

/// Backend scripted per API key: `Ok` replies for healthy keys, errors
/// for the rest. Records the exact (key, model) sequence it was called
/// with.
struct ScriptedBackend {
    replies: HashMap<String, Result<String>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedBackend {
    fn new(replies: Vec<(&str, Result<String>)>) -> Self {
        Self {
            replies: replies
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TextGenerator for ScriptedBackend {
    async fn generate(&self, _prompt: &str, api_key: &str, model: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((api_key.to_string(), model.to_string()));
        match self.replies.get(api_key) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(e)) => Err(Error::Provider {
                provider: "scripted".into(),
                message: e.to_string(),
            }),
            None => Err(Error::Provider {
                provider: "scripted".into(),
                message: format!("unscripted key {api_key}"),
            }),
        }
    }
}

fn provider_err(msg: &str) -> Result<String> {
    Err(Error::Provider {
        provider: "scripted".into(),
        message: msg.into(),
    })
}

#[tokio::test]
async fn second_key_rescues_the_request() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        ("key-a", provider_err("HTTP 503 - overloaded")),
        ("key-b", Ok("all good".into())),
    ]));
    let rotator = Arc::new(
        CredentialRotator::new(
            vec!["key-a".into(), "key-b".into()],
            vec!["flash".into(), "pro".into()],
        )
        .unwrap(),
    );
    let client = GenerationClient::new(backend.clone(), rotator, Duration::from_secs(5));

    let text = client.generate("hello").await.unwrap();
    assert_eq!(text, "all good");

    // First attempt went to (key-a, flash), the rescue to (key-b, pro).
    let calls = backend.calls();
    assert_eq!(
        calls,
        vec![
            ("key-a".to_string(), "flash".to_string()),
            ("key-b".to_string(), "pro".to_string()),
        ]
    );
}

#[tokio::test]
async fn exhaustion_reports_the_last_failure() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        ("key-a", provider_err("HTTP 500 - first")),
        ("key-b", provider_err("HTTP 503 - second")),
    ]));
    let rotator = Arc::new(
        CredentialRotator::new(
            vec!["key-a".into(), "key-b".into()],
            vec!["flash".into()],
        )
        .unwrap(),
    );
    let client = GenerationClient::new(backend.clone(), rotator, Duration::from_secs(5));

    let err = client.generate("hello").await.unwrap_err();
    match err {
        Error::Exhausted { attempts, last } => {
            assert_eq!(attempts, 2);
            assert!(last.contains("HTTP 503 - second"));
        }
        other => panic!("expected Exhausted, got {other}"),
    }
    assert_eq!(backend.calls().len(), 2);
}

#[tokio::test]
async fn consecutive_requests_keep_rotating() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        ("key-a", Ok("from a".into())),
        ("key-b", Ok("from b".into())),
    ]));
    let rotator = Arc::new(
        CredentialRotator::new(
            vec!["key-a".into(), "key-b".into()],
            vec!["flash".into()],
        )
        .unwrap(),
    );
    let client = GenerationClient::new(backend.clone(), rotator, Duration::from_secs(5));

    assert_eq!(client.generate("one").await.unwrap(), "from a");
    assert_eq!(client.generate("two").await.unwrap(), "from b");
    assert_eq!(client.generate("three").await.unwrap(), "from a");
}

#[tokio::test]
async fn structured_output_round_trip() {
    let backend = Arc::new(ScriptedBackend::new(vec![(
        "key-a",
        Ok("```json\n{\"todos\": [{\"title\": \"Rest\"}]}\n```".into()),
    )]));
    let rotator = Arc::new(
        CredentialRotator::new(vec!["key-a".into()], vec!["flash".into()]).unwrap(),
    );
    let client = GenerationClient::new(backend, rotator, Duration::from_secs(5));

    let parsed = client.generate_json("suggest tasks").await.unwrap();
    assert_eq!(parsed["todos"][0]["title"], "Rest");
}

/// Concurrency smoke test: many tasks share one client; every request
/// still succeeds and the total attempt count matches.
#[tokio::test]
async fn concurrent_requests_share_the_rotator() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        ("key-a", Ok("ok".into())),
        ("key-b", Ok("ok".into())),
        ("key-c", Ok("ok".into())),
    ]));
    let rotator = Arc::new(
        CredentialRotator::new(
            vec!["key-a".into(), "key-b".into(), "key-c".into()],
            vec!["flash".into(), "pro".into()],
        )
        .unwrap(),
    );
    let client = Arc::new(GenerationClient::new(
        backend.clone(),
        rotator,
        Duration::from_secs(5),
    ));

    let completed = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::new();
    for _ in 0..24 {
        let client = client.clone();
        let completed = completed.clone();
        handles.push(tokio::spawn(async move {
            assert_eq!(client.generate("go").await.unwrap(), "ok");
            completed.fetch_add(1, Ordering::SeqCst);
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    assert_eq!(completed.load(Ordering::SeqCst), 24);
    assert_eq!(backend.calls().len(), 24);
}
