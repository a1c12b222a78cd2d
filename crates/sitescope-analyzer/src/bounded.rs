//! The single failure-isolation primitive applied to every analyzer stage.
//!
//! A stage gets exactly one attempt, raced against a deadline. Whatever
//! happens (slow analyzer, failing analyzer, unreachable AI service), the
//! caller gets a [`StageResult`] back and the run continues. Retrying is
//! deliberately not this primitive's concern; where retries are wanted (page
//! navigation) they are composed separately in the fetcher.

use sitescope_core::StageResult;
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Default stage deadline.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(300);

/// Run a stage future with a deadline and a tagged fallback.
///
/// - Completion within the deadline returns the stage's result unchanged.
/// - Deadline exceeded returns `Failed { timed_out: true }`. The losing
///   future is dropped, which cancels it at its next suspension point: the
///   caller stops waiting and nothing leaks.
/// - A stage error returns `Failed { timed_out: false }`.
pub async fn run_bounded<T, E, F>(label: &str, deadline: Duration, work: F) -> StageResult<T>
where
    F: Future<Output = std::result::Result<T, E>>,
    E: fmt::Display,
{
    match tokio::time::timeout(deadline, work).await {
        Ok(Ok(result)) => StageResult::ok(result),
        Ok(Err(e)) => {
            tracing::warn!("{} stage failed: {}", label, e);
            StageResult::failed(e.to_string(), false)
        }
        Err(_) => {
            tracing::warn!("{} stage timed out after {:?}", label, deadline);
            StageResult::failed(
                format!("{label} stage timed out after {deadline:?}"),
                true,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_pass_through_unmodified() {
        let outcome: StageResult<u32> =
            run_bounded("test", DEFAULT_DEADLINE, async { Ok::<_, String>(42) }).await;
        assert_eq!(outcome.value(), Some(&42));
    }

    #[tokio::test]
    async fn test_error_becomes_fallback() {
        let outcome: StageResult<u32> = run_bounded("test", DEFAULT_DEADLINE, async {
            Err::<u32, _>("analyzer exploded".to_string())
        })
        .await;

        match outcome {
            StageResult::Failed { error, timed_out, .. } => {
                assert!(error.contains("analyzer exploded"));
                assert!(!timed_out);
            }
            StageResult::Ok { .. } => panic!("expected Failed"),
        }
    }

    #[tokio::test]
    async fn test_never_resolving_stage_times_out_at_deadline() {
        let started = Instant::now();
        let outcome: StageResult<u32> =
            run_bounded("test", Duration::from_millis(50), std::future::pending::<Result<u32, String>>()).await;
        let elapsed = started.elapsed();

        match outcome {
            StageResult::Failed { timed_out, .. } => assert!(timed_out),
            StageResult::Ok { .. } => panic!("expected timeout"),
        }
        assert!(
            elapsed < Duration::from_secs(2),
            "caller must stop waiting at the deadline, waited {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn test_deadline_enforced_with_paused_clock() {
        tokio::time::pause();
        let outcome: StageResult<u32> = run_bounded("test", Duration::from_secs(300), async {
            tokio::time::sleep(Duration::from_secs(301)).await;
            Ok::<_, String>(1)
        })
        .await;
        assert!(!outcome.is_ok());
    }
}
