use crate::domain::model::{ScrollOutcome, ScrollPolicy};
use crate::domain::ports::BrowserSession;
use crate::utils::error::Result;

/// Scrolls to the bottom until `policy.stable_reads` consecutive height
/// readings match the previous one, or `policy.max_rounds` is reached.
///
/// A reading that differs resets the stable count, so a short plateau followed
/// by growth keeps the loop going.
pub async fn scroll_until_stable(
    session: &dyn BrowserSession,
    policy: &ScrollPolicy,
) -> Result<ScrollOutcome> {
    let required = policy.stable_reads.max(1);
    let mut last_height = session.scroll_height().await?;
    let mut stable = 0;
    let mut rounds = 0;

    tracing::debug!("Initial scroll height: {}", last_height);

    loop {
        if policy.max_rounds.is_some_and(|max| rounds >= max) {
            tracing::warn!(
                "Page height still changing after {} scroll rounds, keeping what has loaded",
                rounds
            );
            return Ok(ScrollOutcome {
                rounds,
                final_height: last_height,
                converged: false,
            });
        }

        session.scroll_to_bottom().await?;
        tokio::time::sleep(policy.interval).await;
        rounds += 1;

        let new_height = session.scroll_height().await?;
        if new_height == last_height {
            stable += 1;
            tracing::debug!(
                "Round {}: height {} unchanged ({}/{})",
                rounds,
                new_height,
                stable,
                required
            );
            if stable >= required {
                return Ok(ScrollOutcome {
                    rounds,
                    final_height: new_height,
                    converged: true,
                });
            }
        } else {
            tracing::debug!("Round {}: height {} -> {}", rounds, last_height, new_height);
            stable = 0;
            last_height = new_height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::HarvestError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays scripted heights; repeats the last one when exhausted.
    struct ScriptedPage {
        heights: Mutex<VecDeque<u64>>,
        last: Mutex<u64>,
        scrolls: Mutex<usize>,
    }

    impl ScriptedPage {
        fn new(heights: &[u64]) -> Self {
            Self {
                heights: Mutex::new(heights.iter().copied().collect()),
                last: Mutex::new(0),
                scrolls: Mutex::new(0),
            }
        }

        fn scrolls(&self) -> usize {
            *self.scrolls.lock().unwrap()
        }
    }

    #[async_trait]
    impl BrowserSession for ScriptedPage {
        async fn navigate(&mut self, _url: &str) -> Result<()> {
            Ok(())
        }

        async fn execute_js(&self, _script: &str) -> Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }

        async fn page_source(&self) -> Result<String> {
            Ok(String::new())
        }

        async fn close(self: Box<Self>) -> Result<()> {
            Ok(())
        }

        async fn scroll_height(&self) -> Result<u64> {
            let mut last = self.last.lock().unwrap();
            if let Some(next) = self.heights.lock().unwrap().pop_front() {
                *last = next;
            }
            Ok(*last)
        }

        async fn scroll_to_bottom(&self) -> Result<()> {
            *self.scrolls.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn policy(stable_reads: usize, max_rounds: Option<usize>) -> ScrollPolicy {
        ScrollPolicy {
            interval: Duration::ZERO,
            stable_reads,
            max_rounds,
        }
    }

    #[tokio::test]
    async fn test_stops_on_first_repeated_reading() {
        let page = ScriptedPage::new(&[100, 200, 300, 300, 400]);
        let outcome = scroll_until_stable(&page, &policy(1, None)).await.unwrap();

        assert!(outcome.converged);
        assert_eq!(outcome.rounds, 3);
        assert_eq!(outcome.final_height, 300);
        assert_eq!(page.scrolls(), 3);
    }

    #[tokio::test]
    async fn test_already_stable_page_takes_one_round() {
        let page = ScriptedPage::new(&[500, 500]);
        let outcome = scroll_until_stable(&page, &policy(1, None)).await.unwrap();

        assert!(outcome.converged);
        assert_eq!(outcome.rounds, 1);
    }

    #[tokio::test]
    async fn test_does_not_stop_while_heights_keep_changing() {
        // 100 -> 200 -> 100 never repeats consecutively
        let page = ScriptedPage::new(&[100, 200, 100, 200, 100, 100]);
        let outcome = scroll_until_stable(&page, &policy(1, None)).await.unwrap();

        assert_eq!(outcome.rounds, 5);
        assert_eq!(outcome.final_height, 100);
    }

    #[tokio::test]
    async fn test_short_plateau_is_ignored_with_more_stable_reads() {
        let page = ScriptedPage::new(&[100, 200, 200, 300, 300, 300]);
        let outcome = scroll_until_stable(&page, &policy(2, None)).await.unwrap();

        assert!(outcome.converged);
        assert_eq!(outcome.final_height, 300);
        assert_eq!(outcome.rounds, 5);
    }

    #[tokio::test]
    async fn test_single_stable_read_stops_on_transient_plateau() {
        let page = ScriptedPage::new(&[100, 200, 200, 300, 300]);
        let outcome = scroll_until_stable(&page, &policy(1, None)).await.unwrap();

        assert_eq!(outcome.final_height, 200);
        assert_eq!(outcome.rounds, 2);
    }

    #[tokio::test]
    async fn test_max_rounds_bounds_a_growing_page() {
        let heights: Vec<u64> = (1..=100).map(|h| h * 10).collect();
        let page = ScriptedPage::new(&heights);
        let outcome = scroll_until_stable(&page, &policy(1, Some(4))).await.unwrap();

        assert!(!outcome.converged);
        assert_eq!(outcome.rounds, 4);
        assert_eq!(outcome.final_height, 50);
        assert_eq!(page.scrolls(), 4);
    }

    struct BrokenPage;

    #[async_trait]
    impl BrowserSession for BrokenPage {
        async fn navigate(&mut self, _url: &str) -> Result<()> {
            Ok(())
        }

        async fn execute_js(&self, _script: &str) -> Result<serde_json::Value> {
            Err(HarvestError::browser("target closed"))
        }

        async fn page_source(&self) -> Result<String> {
            Ok(String::new())
        }

        async fn close(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_script_failure_propagates() {
        let result = scroll_until_stable(&BrokenPage, &policy(1, None)).await;
        assert!(matches!(result, Err(HarvestError::BrowserError { .. })));
    }
}
