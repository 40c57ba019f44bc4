//! Tests for the proxy backend pool.

use alcove::config::BackendConfig;
use alcove::proxy::{Backend, BackendPool, BackendState};

fn config(url: &str, name: Option<&str>) -> BackendConfig {
    BackendConfig {
        url: url.to_string(),
        name: name.map(String::from),
    }
}

#[test]
fn backend_creation() {
    let backend = Backend::new(config("http://localhost:3000", Some("backend-1")));
    assert_eq!(backend.url, "http://localhost:3000");
    assert_eq!(backend.display_name(), "backend-1");
    assert!(backend.is_available());
}

#[test]
fn backend_without_name_displays_url() {
    let backend = Backend::new(config("http://localhost:3001", None));
    assert_eq!(backend.display_name(), "http://localhost:3001");
}

#[test]
fn backend_failure_tracking() {
    let mut backend = Backend::new(config("http://localhost:3000", None));

    assert_eq!(backend.consecutive_failures, 0);
    assert_eq!(backend.state, BackendState::Up);

    backend.mark_failed();
    assert_eq!(backend.consecutive_failures, 1);
    assert!(backend.is_available());

    backend.mark_failed();
    assert_eq!(backend.consecutive_failures, 2);
    assert!(backend.is_available());

    // Third consecutive failure takes the backend down.
    backend.mark_failed();
    assert_eq!(backend.consecutive_failures, 3);
    assert!(!backend.is_available());
    assert_eq!(backend.state, BackendState::Down);
}

#[test]
fn backend_recovery() {
    let mut backend = Backend::new(config("http://localhost:3000", None));

    backend.mark_failed();
    backend.mark_failed();
    backend.mark_failed();
    assert!(!backend.is_available());

    backend.mark_success();
    assert!(backend.is_available());
    assert_eq!(backend.consecutive_failures, 0);
    assert_eq!(backend.state, BackendState::Up);
}

#[tokio::test]
async fn round_robin_selection() {
    let pool = BackendPool::new(vec![
        config("http://localhost:3000", None),
        config("http://localhost:3001", None),
    ]);

    let first = pool.select_backend().await.unwrap();
    let second = pool.select_backend().await.unwrap();
    let third = pool.select_backend().await.unwrap();

    assert_eq!(first.url, "http://localhost:3000");
    assert_eq!(second.url, "http://localhost:3001");
    assert_eq!(third.url, "http://localhost:3000");
}

#[tokio::test]
async fn selection_skips_downed_backends() {
    let pool = BackendPool::new(vec![
        config("http://localhost:3000", None),
        config("http://localhost:3001", None),
    ]);

    for _ in 0..3 {
        pool.mark_backend_failed("http://localhost:3000").await;
    }
    assert_eq!(pool.available_count().await, 1);

    let selected = pool.select_backend().await.unwrap();
    assert_eq!(selected.url, "http://localhost:3001");
}

#[tokio::test]
async fn empty_pool_selects_nothing() {
    let pool = BackendPool::new(Vec::new());
    assert!(pool.select_backend().await.is_none());
    assert_eq!(pool.available_count().await, 0);
}

#[tokio::test]
async fn recovery_through_the_pool() {
    let pool = BackendPool::new(vec![config("http://localhost:3000", None)]);

    for _ in 0..3 {
        pool.mark_backend_failed("http://localhost:3000").await;
    }
    assert!(pool.select_backend().await.is_none());

    pool.mark_backend_success("http://localhost:3000").await;
    assert!(pool.select_backend().await.is_some());

    let backends = pool.get_backends().await;
    assert_eq!(backends.len(), 1);
    assert_eq!(backends[0].state, BackendState::Up);
}
