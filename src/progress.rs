// src/progress.rs
// A terminal spinner shown while a run is in flight (drawn on stderr).

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    // A disabled Progress does nothing, so callers never branch on it
    pub fn start(enabled: bool, message: impl Into<String>) -> Self {
        if !enabled {
            return Progress { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]") {
            bar.set_style(style);
        }
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(120));

        Progress { bar: Some(bar) }
    }

    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_progress_has_no_bar() {
        let progress = Progress::start(false, "crawling");
        assert!(progress.bar.is_none());
        progress.finish();
    }

    #[test]
    fn test_enabled_progress_finishes() {
        let progress = Progress::start(true, "crawling");
        assert!(progress.bar.is_some());
        progress.finish();
    }
}
