// src/crawl/visited.rs
// URLs already claimed by some branch of one top-level crawl.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    // Check-and-insert under one lock. Returns true for the single caller
    // that claimed `url`; every later or concurrent caller gets false.
    pub fn mark(&self, url: &str) -> bool {
        let mut urls = self.lock();
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    // The subset of `candidates` nobody has claimed yet, order kept
    pub fn unvisited<'a, I>(&self, candidates: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let urls = self.lock();
        candidates
            .into_iter()
            .filter(|url| !urls.contains(url.as_str()))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    // A panic elsewhere cannot leave the set half-updated, so a poisoned
    // lock is still safe to use
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
