// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fuzzy province → city/regency → district resolution.
//!
//! Each level fetches the authoritative list from the shipping provider and
//! picks the best candidate whose [`fuzzy_score`] is at most
//! [`MATCH_THRESHOLD`]. Ranking is deterministic: lowest score, then a
//! matching administrative kind ("kab" vs "kota") when the customer typed
//! one, then the closest normalized length, then provider order.

use std::sync::Arc;

use kedai_core::{KedaiError, Region, RegionLevel, ShippingAdapter};
use tracing::{debug, warn};

use crate::normalize::{fuzzy_score, normalize, strip_admin_prefix};

/// Maximum score a candidate may have to count as a match.
pub const MATCH_THRESHOLD: f64 = 0.4;

/// Failure of a single resolution step.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No candidate scored within the threshold.
    #[error("{level} not found: {query:?}")]
    NotFound { level: RegionLevel, query: String },

    /// The candidate list could not be fetched.
    #[error("failed to list {level} candidates: {source}")]
    Provider {
        level: RegionLevel,
        #[source]
        source: KedaiError,
    },
}

impl ResolveError {
    pub fn level(&self) -> RegionLevel {
        match self {
            ResolveError::NotFound { level, .. } | ResolveError::Provider { level, .. } => *level,
        }
    }
}

/// Resolves free-text region names against the provider's region lists.
#[derive(Clone)]
pub struct RegionResolver {
    shipping: Arc<dyn ShippingAdapter>,
}

impl RegionResolver {
    pub fn new(shipping: Arc<dyn ShippingAdapter>) -> Self {
        Self { shipping }
    }

    pub async fn resolve_province(&self, text: &str) -> Result<Region, ResolveError> {
        let level = RegionLevel::Province;
        let candidates = self
            .shipping
            .list_provinces()
            .await
            .map_err(|source| ResolveError::Provider { level, source })?;
        pick(level, text, candidates)
    }

    pub async fn resolve_city(&self, province_id: i64, text: &str) -> Result<Region, ResolveError> {
        let level = RegionLevel::City;
        let candidates = self
            .shipping
            .list_cities(province_id)
            .await
            .map_err(|source| ResolveError::Provider { level, source })?;
        pick(level, text, candidates)
    }

    pub async fn resolve_district(&self, city_id: i64, text: &str) -> Result<Region, ResolveError> {
        let level = RegionLevel::District;
        let candidates = self
            .shipping
            .list_districts(city_id)
            .await
            .map_err(|source| ResolveError::Provider { level, source })?;
        pick(level, text, candidates)
    }
}

/// Regency vs municipality marker typed in front of a city name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdminKind {
    Regency,
    Municipality,
}

fn admin_kind(normalized: &str) -> Option<AdminKind> {
    let head = normalized.split(' ').next()?;
    match head {
        "kab" | "kabupaten" => Some(AdminKind::Regency),
        "kota" => Some(AdminKind::Municipality),
        _ => None,
    }
}

/// Best candidate for `text`, or `NotFound`.
pub(crate) fn pick(
    level: RegionLevel,
    text: &str,
    candidates: Vec<Region>,
) -> Result<Region, ResolveError> {
    let normalized = normalize(text);
    let query = strip_admin_prefix(&normalized);
    let not_found = || ResolveError::NotFound {
        level,
        query: text.trim().to_string(),
    };
    if query.is_empty() {
        return Err(not_found());
    }

    let wanted_kind = admin_kind(&normalized);
    let query_len = query.chars().count();

    let mut best: Option<(f64, bool, usize, usize)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let name = normalize(&candidate.name);
        let score = fuzzy_score(query, &name);
        if score > MATCH_THRESHOLD {
            continue;
        }
        let kind_mismatch = wanted_kind.is_some() && admin_kind(&name) != wanted_kind;
        let len_diff = name.chars().count().abs_diff(query_len);
        let key = (score, kind_mismatch, len_diff, index);
        let better = match &best {
            None => true,
            Some(current) => {
                score < current.0
                    || (score == current.0 && (kind_mismatch, len_diff) < (current.1, current.2))
            }
        };
        if better {
            best = Some(key);
        }
    }

    match best {
        Some((score, _, _, index)) => {
            let region = candidates
                .into_iter()
                .nth(index)
                .ok_or_else(not_found)?;
            debug!(%level, query, matched = %region.name, id = region.id, score, "region resolved");
            Ok(region)
        }
        None => {
            warn!(%level, query, "no region within match threshold");
            Err(not_found())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions(names: &[&str]) -> Vec<Region> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Region {
                id: i as i64 + 1,
                name: (*n).to_string(),
            })
            .collect()
    }

    #[test]
    fn exact_canonical_name_resolves() {
        let list = regions(&["BANTEN", "JAWA BARAT", "JAWA TENGAH"]);
        assert_eq!(pick(RegionLevel::Province, "Banten", list).unwrap().id, 1);
    }

    #[test]
    fn parenthetical_noise_is_ignored() {
        let list = regions(&["SERANG", "CILEGON"]);
        let region = pick(RegionLevel::City, "Cilegon (Kota Baja)", list).unwrap();
        assert_eq!(region.name, "CILEGON");
    }

    #[test]
    fn typo_within_threshold_resolves() {
        let list = regions(&["CIBEBER", "CIWANDAN", "CITANGKIL"]);
        assert_eq!(pick(RegionLevel::District, "cibebr", list).unwrap().name, "CIBEBER");
    }

    #[test]
    fn unrelated_query_is_not_found() {
        let list = regions(&["BANTEN", "JAWA BARAT"]);
        let err = pick(RegionLevel::Province, "Papua", list).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::NotFound { level: RegionLevel::Province, ref query } if query == "Papua"
        ));
    }

    #[test]
    fn empty_query_is_not_found() {
        let list = regions(&["BANTEN"]);
        assert!(pick(RegionLevel::Province, "  (.) ", list).is_err());
    }

    #[test]
    fn admin_prefix_is_dropped_before_scoring() {
        let list = regions(&["CILEGON", "SERANG"]);
        assert_eq!(pick(RegionLevel::City, "kota Cilegon", list).unwrap().name, "CILEGON");
    }

    #[test]
    fn typed_kind_breaks_ties() {
        let list = regions(&["KABUPATEN SERANG", "KOTA SERANG"]);
        assert_eq!(
            pick(RegionLevel::City, "kab. Serang", list.clone()).unwrap().name,
            "KABUPATEN SERANG"
        );
        assert_eq!(pick(RegionLevel::City, "Kota Serang", list).unwrap().name, "KOTA SERANG");
    }

    #[test]
    fn closest_length_then_provider_order_breaks_ties() {
        let list = regions(&["JAKARTA SELATAN", "JAKARTA", "JAKARTA"]);
        let region = pick(RegionLevel::City, "jakarta", list).unwrap();
        assert_eq!(region.id, 2);
    }

    #[test]
    fn equal_scores_rank_kind_then_length_then_provider_order() {
        // Every candidate contains "serang", so all score 0.0.
        let list = regions(&[
            "SERANG",
            "KABUPATEN SERANG",
            "KOTA SERANG TIMUR",
            "KOTA SERANG TIMUR",
        ]);
        assert_eq!(pick(RegionLevel::City, "Kota Serang", list.clone()).unwrap().id, 3);

        // Without a typed kind the shortest gap wins over an earlier candidate.
        assert_eq!(pick(RegionLevel::City, "serang", list).unwrap().id, 1);
        let list = regions(&["KOTA SERANG", "SERANG"]);
        assert_eq!(pick(RegionLevel::City, "serang", list).unwrap().id, 2);
    }

    #[test]
    fn error_reports_level() {
        let err = ResolveError::NotFound {
            level: RegionLevel::District,
            query: "x".into(),
        };
        assert_eq!(err.level(), RegionLevel::District);
    }
}
