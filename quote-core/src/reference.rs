//! Quotation reference numbers.
//!
//! References have the fixed shape `Quote NNNN-YY`: a four-digit,
//! zero-padded sequence and a two-digit year suffix. Sequences restart at
//! `0001` for each year suffix; the suffix itself keeps references unique
//! across year boundaries. Strings that do not match the shape (legacy or
//! hand-edited history entries) contribute no sequence value and are simply
//! skipped when scanning — they still count for collision checks.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::debug;

/// Structured pieces of a well-formed reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceParts {
    pub sequence: u32,
    pub year_suffix: String,
}

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^quote\s+(\d+)-(\d{2})$").expect("reference pattern is valid")
    })
}

/// Parses a reference into its sequence and year suffix, or `None` when the
/// string does not match `Quote NNNN-YY` (case-insensitive, trimmed).
pub fn parse_reference(s: &str) -> Option<ReferenceParts> {
    let caps = reference_pattern().captures(s.trim())?;
    let sequence = caps[1].parse().ok()?;
    Some(ReferenceParts {
        sequence,
        year_suffix: caps[2].to_string(),
    })
}

/// Formats a reference from a sequence and a two-digit year suffix.
pub fn format_reference(
    sequence: u32,
    year_suffix: &str,
) -> String {
    format!("Quote {sequence:04}-{year_suffix}")
}

/// Two-digit year suffix for a calendar date.
pub fn year_suffix(date: NaiveDate) -> String {
    format!("{:02}", date.year().rem_euclid(100))
}

/// Next unique reference for the given year suffix.
///
/// Scans `existing` (and the in-progress quote's own reference, when given)
/// for references carrying the same year suffix and takes the highest
/// sequence found, plus one. The candidate is then checked against every
/// taken reference case-insensitively; a collision — possible when history
/// was hand-edited into something the scan does not credit — bumps the
/// sequence until the candidate is free.
pub fn next_reference<'a, I>(
    existing: I,
    current: Option<&str>,
    year_suffix: &str,
) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut taken: Vec<String> = existing
        .into_iter()
        .map(|r| r.trim().to_lowercase())
        .collect();
    if let Some(current) = current {
        taken.push(current.trim().to_lowercase());
    }

    let mut max_sequence = 0u32;
    for reference in &taken {
        if let Some(parts) = parse_reference(reference) {
            if parts.year_suffix == year_suffix && parts.sequence > max_sequence {
                max_sequence = parts.sequence;
            }
        }
    }

    let mut sequence = max_sequence.saturating_add(1);
    loop {
        let candidate = format_reference(sequence, year_suffix);
        if !taken.contains(&candidate.to_lowercase()) {
            return candidate;
        }
        debug!(candidate, "reference already taken, bumping sequence");
        sequence = sequence.saturating_add(1);
    }
}
