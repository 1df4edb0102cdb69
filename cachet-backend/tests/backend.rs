mod common;

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use cachet_backend::{Backend, BackendError, CacheKey, SetOptions};
use common::{ErrorBackend, TestBackend};

fn key(value: &str) -> CacheKey {
    CacheKey::new(value).unwrap()
}

#[tokio::test]
async fn test_set_then_get() {
    let backend = TestBackend::new();
    let key = key("/r?q=1");

    assert!(backend.get(&key).await.unwrap().is_none());

    backend
        .set(&key, Bytes::from_static(b"hi"), SetOptions::default())
        .await
        .unwrap();

    assert_eq!(backend.get(&key).await.unwrap(), Some(Bytes::from_static(b"hi")));
}

#[tokio::test]
async fn test_set_overwrites_previous_value() {
    let backend = TestBackend::new();
    let key = key("pub1");

    backend
        .set(&key, Bytes::from_static(b"first"), SetOptions::default())
        .await
        .unwrap();
    backend
        .set(&key, Bytes::from_static(b"second"), SetOptions::expires(Duration::from_secs(5)))
        .await
        .unwrap();

    assert_eq!(backend.get(&key).await.unwrap(), Some(Bytes::from_static(b"second")));
    assert_eq!(
        backend.options(&key),
        Some(SetOptions::expires(Duration::from_secs(5)))
    );
}

#[tokio::test]
async fn test_trait_objects_delegate() {
    let backend: Arc<dyn Backend + Send + 'static> = Arc::new(TestBackend::new());
    let key = key("dyn");

    backend
        .set(&key, Bytes::from_static(b"value"), SetOptions::default())
        .await
        .unwrap();

    assert_eq!(backend.name(), "test");
    assert!(backend.get(&key).await.unwrap().is_some());

    let boxed: Box<dyn Backend> = Box::new(TestBackend::new());
    assert!(boxed.get(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn test_errors_are_returned_to_caller() {
    let backend = ErrorBackend;
    let key = key("broken");

    let read = backend.get(&key).await;
    assert!(matches!(read, Err(BackendError::InternalError(_))));

    let write = backend
        .set(&key, Bytes::from_static(b"x"), SetOptions::default())
        .await;
    assert!(matches!(write, Err(BackendError::InternalError(_))));
}
