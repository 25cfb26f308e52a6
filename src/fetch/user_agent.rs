// src/fetch/user_agent.rs
// Fills in a browser User-Agent when the caller did not set one.

use rand::seq::SliceRandom;

use super::Headers;

pub const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/113.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/110.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:108.0) Gecko/20100101 Firefox/108.0",
];

// Returns a copy of `headers` that is guaranteed to carry a User-Agent.
// A header the caller supplied (any casing) is never replaced.
pub fn with_user_agent(headers: &Headers) -> Headers {
    let mut headers = headers.clone();
    let has_agent = headers
        .keys()
        .any(|name| name.eq_ignore_ascii_case("user-agent"));

    if !has_agent {
        let agent = USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);
        headers.insert("User-Agent".to_string(), agent.to_string());
    }

    headers
}
