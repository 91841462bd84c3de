//! Bounded waits for external calls

use anyhow::{anyhow, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Await `fut` for at most `limit`, folding expiry into the same error path as failure
pub async fn bounded<T, F>(limit: Duration, what: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    timeout(limit, fut)
        .await
        .map_err(|_| anyhow!("{what} timed out after {} seconds", limit.as_secs_f32()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_through_success() {
        let value = bounded(Duration::from_secs(1), "noop", async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_bounded_passes_through_error() {
        let err = bounded::<(), _>(Duration::from_secs(1), "noop", async {
            Err(anyhow!("boom"))
        })
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let err = bounded(Duration::from_millis(20), "Scripture lookup", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Scripture lookup timed out"));
    }
}
