//! Join policies for composite rules.
//!
//! Every nested check is created before the join is awaited and the checks
//! are polled concurrently. Checks that lose the race are dropped without
//! being polled again.

use futures::future::{try_join_all, Future};
use futures::stream::{FuturesUnordered, StreamExt};

/// Wait for every check; the first failure wins.
///
/// Results come back in input order. An empty set passes.
pub async fn all_must_pass<I, F, T, E>(checks: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    try_join_all(checks).await
}

/// Wait for the first successful check.
///
/// Successes and failures are taken in completion order: the first success
/// wins, otherwise the first failure is reported. Returns `None` for an
/// empty set.
pub async fn first_success<I, F, T, E>(checks: I) -> Option<Result<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    let mut pending: FuturesUnordered<F> = checks.into_iter().collect();
    let mut first_failure = None;

    while let Some(result) = pending.next().await {
        match result {
            Ok(value) => return Some(Ok(value)),
            Err(err) => {
                if first_failure.is_none() {
                    first_failure = Some(err);
                }
            }
        }
    }

    first_failure.map(Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::future::{self, BoxFuture, FutureExt};

    /// Resolves after yielding `turns` times.
    fn after(turns: usize, result: Result<u32, &'static str>) -> BoxFuture<'static, Result<u32, &'static str>> {
        async move {
            for _ in 0..turns {
                let mut yielded = false;
                future::poll_fn(|cx| {
                    if yielded {
                        std::task::Poll::Ready(())
                    } else {
                        yielded = true;
                        cx.waker().wake_by_ref();
                        std::task::Poll::Pending
                    }
                })
                .await;
            }
            result
        }
        .boxed()
    }

    #[test]
    fn test_all_must_pass_keeps_input_order() {
        let checks = vec![after(2, Ok(1)), after(0, Ok(2)), after(1, Ok(3))];
        assert_eq!(block_on(all_must_pass(checks)), Ok(vec![1, 2, 3]));
    }

    #[test]
    fn test_all_must_pass_empty_set_passes() {
        let checks: Vec<BoxFuture<'static, Result<u32, &'static str>>> = Vec::new();
        assert_eq!(block_on(all_must_pass(checks)), Ok(Vec::new()));
    }

    #[test]
    fn test_all_must_pass_reports_failure() {
        let checks = vec![after(0, Ok(1)), after(1, Err("bad"))];
        assert_eq!(block_on(all_must_pass(checks)), Err("bad"));
    }

    #[test]
    fn test_first_success_uses_completion_order() {
        let checks = vec![after(3, Ok(1)), after(1, Ok(2)), after(0, Err("no"))];
        assert_eq!(block_on(first_success(checks)), Some(Ok(2)));
    }

    #[test]
    fn test_first_success_reports_first_failure() {
        let checks = vec![after(2, Err("slow")), after(0, Err("fast"))];
        assert_eq!(block_on(first_success(checks)), Some(Err("fast")));
    }

    #[test]
    fn test_first_success_empty_set() {
        let checks: Vec<BoxFuture<'static, Result<u32, &'static str>>> = Vec::new();
        assert_eq!(block_on(first_success(checks)), None);
    }
}
