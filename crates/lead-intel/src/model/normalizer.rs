//! Canonical forms for company names, tax ids and domains.

use deunicode::deunicode;
use regex::Regex;
use std::sync::LazyLock;

/// Ratio used when callers do not configure their own name threshold.
pub const DEFAULT_NAME_THRESHOLD: f64 = 0.88;

static RE_NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Trailing tokens that name a legal form rather than the company itself.
const LEGAL_SUFFIXES: &[&str] = &[
    "sa", "ltda", "eireli", "epp", "me", "mei", "ss", "slu", "inc", "llc", "ltd", "corp", "co",
    "gmbh", "plc", "ag", "bv", "limited", "incorporated", "corporation",
];

/// Shortest normalized name accepted as a brand prefix of a longer name.
const MIN_PREFIX_LEN: usize = 5;

pub fn normalize_name(value: &str) -> String {
    let latin = deunicode(value).to_lowercase();
    let joined = latin.replace(['.', '/'], "");
    let cleaned = RE_NON_ALNUM.replace_all(&joined, " ");
    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();

    while tokens.len() > 1 {
        match tokens.last() {
            Some(last) if LEGAL_SUFFIXES.contains(last) => {
                tokens.pop();
            }
            _ => break,
        }
    }

    tokens.join(" ")
}

pub fn normalize_tax_id(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

pub fn normalize_domain(value: &str) -> String {
    let lower = value.trim().to_ascii_lowercase();
    let without_scheme = lower
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(lower.as_str());
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// Normalizes free-text labels (sector, city, state, signals) for comparisons.
pub fn normalize_label(value: &str) -> String {
    let latin = deunicode(value).to_lowercase();
    latin.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `candidate` names the company known as `canonical`. Both are normalized.
///
/// A leading-token prefix of the canonical name is accepted as a short brand;
/// a longer name that merely starts with the canonical one is not.
pub fn is_name_variant(canonical: &str, candidate: &str, threshold: f64) -> bool {
    if canonical.is_empty() || candidate.is_empty() {
        return false;
    }
    if canonical == candidate {
        return true;
    }
    if strsim::normalized_levenshtein(canonical, candidate) >= threshold {
        return true;
    }

    candidate.len() >= MIN_PREFIX_LEN
        && canonical.len() > candidate.len()
        && canonical.starts_with(candidate)
        && canonical[candidate.len()..].starts_with(' ')
}

/// Symmetric fuzzy equality over normalized names, for peers with no canonical side.
pub fn normalized_names_match(left: &str, right: &str, threshold: f64) -> bool {
    is_name_variant(left, right, threshold) || is_name_variant(right, left, threshold)
}

/// Whether the raw `candidate` name refers to the company named `canonical`.
pub fn names_match(canonical: &str, candidate: &str, threshold: f64) -> bool {
    is_name_variant(&normalize_name(canonical), &normalize_name(candidate), threshold)
}
