//! Connection-URL resolution from the environment.
//!
//! A logical data-source name maps onto environment keys in a fixed
//! order: the name exactly as given, the name upper-cased, then the
//! upper-cased name with `_DATABASE_URL` appended. With no name, the
//! single candidate is the well-known `DATABASE_URL` key. The first key
//! present in the environment wins; a set-but-empty variable counts as
//! present. No match is a fatal configuration error listing every key
//! that was tried.

use std::env;

use crate::error::{DbError, Result};

/// Well-known key used when no data-source name is given.
pub const DEFAULT_ENV_KEY: &str = "DATABASE_URL";

/// Suffix appended to the upper-cased name as the last candidate.
pub const ENV_KEY_SUFFIX: &str = "_DATABASE_URL";

/// A connection URL together with the environment key that supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    pub url: String,
    pub key: String,
}

/// Candidate environment keys for a data-source name, in resolution order.
///
/// Duplicates collapse, so an already upper-cased name is checked once.
pub fn candidate_keys(name: Option<&str>) -> Vec<String> {
    let Some(name) = name else {
        return vec![DEFAULT_ENV_KEY.to_string()];
    };

    let upper = name.to_uppercase();
    let suffixed = format!("{upper}{ENV_KEY_SUFFIX}");

    let mut keys = vec![name.to_string()];
    if !keys.contains(&upper) {
        keys.push(upper);
    }
    if !keys.contains(&suffixed) {
        keys.push(suffixed);
    }
    keys
}

/// Resolve a data-source name against the process environment.
pub fn resolve(name: Option<&str>) -> Result<ResolvedUrl> {
    resolve_with(name, |key| env::var(key).ok())
}

/// Resolve a data-source name against an arbitrary lookup.
///
/// `resolve` passes `std::env::var`; tests pass a map so resolution
/// order can be exercised without touching the process environment.
pub fn resolve_with<F>(name: Option<&str>, lookup: F) -> Result<ResolvedUrl>
where
    F: Fn(&str) -> Option<String>,
{
    let candidates = candidate_keys(name);
    for key in &candidates {
        if let Some(url) = lookup(key) {
            return Ok(ResolvedUrl {
                url,
                key: key.clone(),
            });
        }
    }
    Err(DbError::missing_config(candidates))
}
