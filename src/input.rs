// src/input.rs
// =============================================================================
// Turns raw command-line values into validated inputs.
//
// Most options accept either a literal value or the path of a file with one
// value per line:
// - targets: URL, bare domain, or file of targets
// - headers: "Name: value", or file of such lines
// - keywords: a word, or file of words
// - wordlists: file path, or the built-in default list
// =============================================================================

use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::warn;

use crate::error::InputError;
use crate::fetch::Headers;

pub const DEFAULT_KEYWORDS: [&str; 8] = [
    "password", "api_key", "token", "secret", "key", "auth", "login", "access",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Url(String),
    Domain(String),
}

fn domain_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("domain pattern is valid"))
}

// Classifies a single target string
pub fn parse_target(value: &str) -> Result<Target, InputError> {
    let value = value.trim();

    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(Target::Url(value.to_string()))
    } else if domain_pattern().is_match(value) {
        Ok(Target::Domain(value.to_string()))
    } else {
        Err(InputError::MalformedTarget(value.to_string()))
    }
}

// Expands every argument into targets; files contribute one target per
// non-empty line (lines starting with '#' are skipped)
pub fn load_targets(args: &[String]) -> Result<Vec<Target>, InputError> {
    let mut targets = Vec::new();

    for arg in args {
        let path = Path::new(arg);
        if path.is_file() {
            for line in read_lines(path, "target")? {
                targets.push(parse_target(&line)?);
            }
        } else {
            targets.push(parse_target(arg)?);
        }
    }

    if targets.is_empty() {
        return Err(InputError::NoTargets);
    }
    Ok(targets)
}

// Every target must be a full URL (crawl mode)
pub fn require_urls(targets: &[Target], mode: &'static str) -> Result<Vec<String>, InputError> {
    targets
        .iter()
        .map(|target| match target {
            Target::Url(url) => Ok(url.clone()),
            Target::Domain(domain) => Err(InputError::ExpectedUrl {
                mode,
                target: domain.clone(),
            }),
        })
        .collect()
}

pub fn require_single_url(targets: &[Target], mode: &'static str) -> Result<String, InputError> {
    let [target] = targets else {
        return Err(InputError::TargetCount {
            mode,
            count: targets.len(),
        });
    };
    match target {
        Target::Url(url) => Ok(url.clone()),
        Target::Domain(domain) => Err(InputError::ExpectedUrl {
            mode,
            target: domain.clone(),
        }),
    }
}

pub fn require_single_domain(targets: &[Target], mode: &'static str) -> Result<String, InputError> {
    let [target] = targets else {
        return Err(InputError::TargetCount {
            mode,
            count: targets.len(),
        });
    };
    match target {
        Target::Domain(domain) => Ok(domain.clone()),
        Target::Url(url) => Err(InputError::ExpectedDomain {
            mode,
            target: url.clone(),
        }),
    }
}

// Parses "Name: value"; the value may itself contain colons
pub fn parse_header(line: &str) -> Option<(String, String)> {
    let (name, value) = line.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}

// Malformed header entries are logged and skipped, not fatal
pub fn load_headers(args: &[String]) -> Result<Headers, InputError> {
    let mut headers = Headers::new();

    for arg in args {
        let path = Path::new(arg);
        let lines = if path.is_file() {
            read_lines(path, "header")?
        } else {
            vec![arg.clone()]
        };

        for line in lines {
            match parse_header(&line) {
                Some((name, value)) => {
                    headers.insert(name, value);
                }
                None => warn!(header = %line, "invalid header format, expected 'Name: value'"),
            }
        }
    }

    Ok(headers)
}

// Without arguments the default keyword list is used
pub fn load_keywords(args: &[String]) -> Result<Vec<String>, InputError> {
    if args.is_empty() {
        return Ok(DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect());
    }

    let mut keywords = Vec::new();
    for arg in args {
        let path = Path::new(arg);
        if path.is_file() {
            keywords.extend(read_lines(path, "keyword")?);
        } else if !arg.trim().is_empty() {
            keywords.push(arg.trim().to_string());
        }
    }

    Ok(dedup(keywords))
}

pub fn load_wordlist(path: Option<&Path>, default: &[&str]) -> Result<Vec<String>, InputError> {
    match path {
        None => Ok(default.iter().map(|word| word.to_string()).collect()),
        Some(path) if path.is_file() => read_lines(path, "wordlist"),
        Some(path) => Err(InputError::MissingWordlist(path.to_path_buf())),
    }
}

// Trimmed, non-empty, non-comment lines
fn read_lines(path: &Path, kind: &'static str) -> Result<Vec<String>, InputError> {
    let content = fs::read_to_string(path).map_err(|source| InputError::FileRead {
        kind,
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

// Drops repeats, keeps first-seen order
fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
