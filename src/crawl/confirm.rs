// src/crawl/confirm.rs
// =============================================================================
// Operator confirmation for unbounded crawls (`--ask`).
//
// Before a page's links are expanded the crawler asks whether to go on.
// Only the asking branch waits; other branches keep crawling. Prompts are
// taken one at a time so two branches never write over each other.
// =============================================================================

use async_trait::async_trait;
use std::io::{BufRead, Write};
use tokio::sync::Mutex;
use tracing::warn;

#[async_trait]
pub trait Confirm: Send + Sync {
    // `pending` is the number of new links that would be crawled
    async fn confirm(&self, url: &str, depth: usize, pending: usize) -> bool;
}

// Writes a prompt and reads one line of answer. Runs on a blocking thread.
type Terminal = fn(String) -> std::io::Result<String>;

// Asks on stderr, reads the answer from stdin
#[derive(Debug)]
pub struct StdinConfirm {
    turn: Mutex<()>,
    terminal: Terminal,
}

impl StdinConfirm {
    pub fn new() -> Self {
        StdinConfirm {
            turn: Mutex::new(()),
            terminal: prompt_on_stderr,
        }
    }
}

impl Default for StdinConfirm {
    fn default() -> Self {
        Self::new()
    }
}

fn prompt_on_stderr(prompt: String) -> std::io::Result<String> {
    let mut stderr = std::io::stderr();
    write!(stderr, "{}", prompt)?;
    stderr.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&self, url: &str, depth: usize, pending: usize) -> bool {
        let _turn = self.turn.lock().await;

        let prompt = format!(
            "Continue crawling {} new link(s) found on {} (depth {})? [y/N] ",
            pending, url, depth
        );

        // stdin is blocking; keep it off the async worker threads
        let terminal = self.terminal;
        let answer = tokio::task::spawn_blocking(move || terminal(prompt)).await;

        match answer {
            Ok(Ok(line)) => is_yes(&line),
            Ok(Err(e)) => {
                warn!(error = %e, "could not read confirmation, stopping here");
                false
            }
            Err(e) => {
                warn!(error = %e, "confirmation prompt failed, stopping here");
                false
            }
        }
    }
}

// Answers every prompt the same way (`--yes`, tests)
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

#[async_trait]
impl Confirm for FixedAnswer {
    async fn confirm(&self, _url: &str, _depth: usize, _pending: usize) -> bool {
        self.0
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_yes_answers() {
        assert!(is_yes("y\n"));
        assert!(is_yes("  YES \r\n"));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }

    static ACTIVE: AtomicUsize = AtomicUsize::new(0);
    static MOST_ACTIVE: AtomicUsize = AtomicUsize::new(0);

    // Slow terminal that records how many prompts are open at once
    fn slow_terminal(prompt: String) -> std::io::Result<String> {
        let open = ACTIVE.fetch_add(1, Ordering::SeqCst) + 1;
        MOST_ACTIVE.fetch_max(open, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(50));
        ACTIVE.fetch_sub(1, Ordering::SeqCst);

        Ok(if prompt.contains("https://a.test/") { "y\n" } else { "n\n" }.to_string())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_prompts_take_turns() {
        let confirm = Arc::new(StdinConfirm {
            turn: Mutex::new(()),
            terminal: slow_terminal,
        });

        let first = tokio::spawn({
            let confirm = Arc::clone(&confirm);
            async move { confirm.confirm("https://a.test/", 1, 2).await }
        });
        let second = tokio::spawn({
            let confirm = Arc::clone(&confirm);
            async move { confirm.confirm("https://b.test/", 2, 1).await }
        });

        assert!(first.await.unwrap());
        assert!(!second.await.unwrap());
        assert_eq!(MOST_ACTIVE.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fixed_answer() {
        assert!(FixedAnswer(true).confirm("https://a.test", 1, 3).await);
        assert!(!FixedAnswer(false).confirm("https://a.test", 1, 3).await);
    }
}
