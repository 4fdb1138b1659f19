// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Region-name normalization and fuzzy scoring.

use std::sync::LazyLock;

use regex::Regex;

static PARENTHESIZED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(.*?\)").unwrap());
static NON_ALPHANUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Administrative prefixes customers type in front of region names.
const ADMIN_PREFIXES: &[&str] = &[
    "provinsi",
    "prov",
    "kabupaten",
    "kab",
    "kota",
    "kecamatan",
    "kec",
];

/// Canonical comparison form of a region name.
///
/// Lower-cases, drops parenthesized content, drops anything that is not
/// `a-z`, `0-9` or whitespace, collapses whitespace and trims. Idempotent.
pub fn normalize(name: &str) -> String {
    let lower = name.to_lowercase();
    let without_parens = PARENTHESIZED.replace_all(&lower, "");
    let alnum = NON_ALPHANUMERIC.replace_all(&without_parens, "");
    WHITESPACE.replace_all(&alnum, " ").trim().to_string()
}

/// Drop one leading administrative prefix ("kab", "kota", ...) from an
/// already-normalized query. Returns the input when nothing would remain.
pub fn strip_admin_prefix(normalized: &str) -> &str {
    for prefix in ADMIN_PREFIXES {
        if let Some(rest) = normalized.strip_prefix(prefix)
            && let Some(rest) = rest.strip_prefix(' ')
            && !rest.is_empty()
        {
            return rest;
        }
    }
    normalized
}

/// Fuzzy score of `query` against `candidate`, both normalized.
///
/// The score is the smallest edit distance between the query and any
/// substring of the candidate, divided by the query length: `0.0` means the
/// query occurs verbatim somewhere in the candidate, `1.0` means nothing in
/// common. Match position inside the candidate is ignored.
pub fn fuzzy_score(query: &str, candidate: &str) -> f64 {
    let q: Vec<char> = query.chars().collect();
    let t: Vec<char> = candidate.chars().collect();
    if q.is_empty() {
        return 1.0;
    }

    // Sellers' algorithm: row 0 is all zeros so a match may start anywhere.
    let mut prev = vec![0usize; t.len() + 1];
    let mut curr = vec![0usize; t.len() + 1];
    for (i, qc) in q.iter().enumerate() {
        curr[0] = i + 1;
        for (j, tc) in t.iter().enumerate() {
            let substitution = prev[j] + usize::from(qc != tc);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let distance = prev.iter().copied().min().unwrap_or(q.len());
    (distance as f64 / q.len() as f64).min(1.0)
}
