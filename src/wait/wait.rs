use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Poll `condition` every `interval` until it returns true or `timeout`
/// elapses. The condition is always checked at least once.
pub async fn wait_until<F, Fut>(mut condition: F, timeout: Duration, interval: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if condition().await {
            return true;
        }
        if Instant::now() + interval > deadline {
            return false;
        }
        sleep(interval).await;
    }
}

/// Like `wait_until`, but hands back the value the probe produced.
pub async fn wait_for<T, F, Fut>(
    mut probe: F,
    timeout: Duration,
    interval: Duration,
) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(value) = probe().await {
            return Some(value);
        }
        if Instant::now() + interval > deadline {
            return None;
        }
        sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn condition_met_on_a_later_poll() {
        let polls = AtomicU32::new(0);
        let ok = wait_until(
            || {
                let n = polls.fetch_add(1, Ordering::SeqCst);
                async move { n >= 3 }
            },
            Duration::from_secs(5),
            Duration::from_millis(100),
        )
        .await;
        assert!(ok);
        assert_eq!(polls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_when_condition_never_holds() {
        let ok = wait_until(
            || async { false },
            Duration::from_millis(300),
            Duration::from_millis(100),
        )
        .await;
        assert!(!ok);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_returns_probed_value() {
        let polls = AtomicU32::new(0);
        let value = wait_for(
            || {
                let n = polls.fetch_add(1, Ordering::SeqCst);
                async move { (n >= 2).then_some("ready") }
            },
            Duration::from_secs(1),
            Duration::from_millis(50),
        )
        .await;
        assert_eq!(value, Some("ready"));
    }
}
