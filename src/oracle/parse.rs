//! Verdict parsing. Malformed tokens and lines are dropped, never fatal.

use std::collections::HashSet;

use tracing::warn;

use crate::shortlist::{PoolPosition, Shortlist, ShortlistEntry};

/// Strips decoration an LLM tends to add around a number.
fn clean_token(token: &str) -> &str {
    let decoration = |c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '*');
    let token = token.trim_matches(decoration);
    let token = token.strip_suffix('.').unwrap_or(token);
    token.trim_matches(decoration)
}

/// Parses a token as a 1-based number. Only plain ASCII digits are accepted.
fn parse_rank(token: &str) -> Option<usize> {
    let token = clean_token(token);
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Parses a single-query verdict such as `"1, 3"` against `shortlist`.
///
/// Returns the matched entries in first-mention order without duplicates.
pub fn parse_match_verdict(verdict: &str, shortlist: &Shortlist) -> Vec<ShortlistEntry> {
    let mut seen = HashSet::new();
    let mut matched = Vec::new();

    if verdict.trim().is_empty() {
        return matched;
    }

    for token in verdict.split(',') {
        let Some(rank) = parse_rank(token) else {
            if !token.trim().is_empty() {
                warn!(token = token.trim(), "Dropping non-numeric oracle token");
            }
            continue;
        };

        let Some(entry) = shortlist.resolve(rank) else {
            warn!(
                rank,
                shortlist_len = shortlist.len(),
                "Dropping out-of-range oracle token"
            );
            continue;
        };

        if seen.insert(entry.position) {
            matched.push(*entry);
        }
    }

    matched
}

/// Parses a grouping verdict of `Group N: a, b, ...` lines over a pool of `pool_len`.
///
/// Groups form a partition: a position already placed in an earlier group is
/// skipped, repeats within a line collapse, and a line needs two or more
/// remaining members to count.
pub fn parse_group_verdict(verdict: &str, pool_len: usize) -> Vec<Vec<PoolPosition>> {
    let mut claimed = HashSet::new();
    let mut groups = Vec::new();

    for line in verdict.lines() {
        let Some((_, members)) = line.split_once(':') else {
            continue;
        };

        let mut group: Vec<PoolPosition> = Vec::new();
        for token in members.split(',') {
            let Some(rank) = parse_rank(token) else {
                continue;
            };

            let Some(index) = rank.checked_sub(1).filter(|&i| i < pool_len) else {
                warn!(rank, pool_len, "Dropping out-of-range group member");
                continue;
            };

            let position = PoolPosition::new(index);
            if claimed.contains(&position) || group.contains(&position) {
                continue;
            }
            group.push(position);
        }

        if group.len() >= 2 {
            claimed.extend(group.iter().copied());
            groups.push(group);
        } else {
            warn!(line = line.trim(), "Dropping group line with fewer than two members");
        }
    }

    groups
}
