mod patterns;

pub use patterns::builtin_patterns;

use tracing::debug;

use crate::models::{CanonicalLocation, NormalizedObservation, Observation};

/// One entry of the normalization table: a case-insensitive substring
/// pattern, the canonical city it maps to, and an optional country
/// constraint for city names that exist in several countries.
#[derive(Debug, Clone)]
pub struct LocationPattern {
    pattern: String,
    city: String,
    country: Option<String>,
}

impl LocationPattern {
    pub fn new(pattern: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into().to_lowercase(),
            city: city.into(),
            country: None,
        }
    }

    pub fn in_country(
        pattern: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into().to_lowercase(),
            city: city.into(),
            country: Some(country.into().to_uppercase()),
        }
    }
}

/// Maps raw free-text location labels to canonical locations via an
/// ordered pattern table. First match wins, so variant spellings and
/// overlapping patterns resolve by table position instead of by an
/// open-ended chain of special cases.
pub struct LocationNormalizer {
    patterns: Vec<LocationPattern>,
}

impl LocationNormalizer {
    pub fn new(patterns: Vec<LocationPattern>) -> Self {
        Self { patterns }
    }

    pub fn with_builtin_patterns() -> Self {
        Self::new(builtin_patterns())
    }

    /// Resolve a raw label with its country context. `None` means the
    /// label is unrecognized or excluded; it is a normal outcome, and
    /// callers drop such rows before aggregating.
    pub fn normalize(&self, raw_label: &str, country: &str) -> Option<CanonicalLocation> {
        let label = raw_label.to_lowercase();

        for entry in &self.patterns {
            if !label.contains(&entry.pattern) {
                continue;
            }
            // A constrained entry only matches its own country; scanning
            // continues so a later entry for the same pattern can claim
            // the label.
            if let Some(required) = &entry.country {
                if !required.eq_ignore_ascii_case(country.trim()) {
                    continue;
                }
                return Some(CanonicalLocation::new(entry.city.clone(), required.clone()));
            }
            return Some(CanonicalLocation::new(
                entry.city.clone(),
                country.trim().to_uppercase(),
            ));
        }

        None
    }

    /// Normalize a batch, dropping rows whose label does not resolve.
    pub fn normalize_all(&self, observations: &[Observation]) -> Vec<NormalizedObservation> {
        let mut resolved = Vec::with_capacity(observations.len());
        let mut dropped = 0usize;

        for obs in observations {
            match self.normalize(&obs.location_raw, &obs.country) {
                Some(location) => resolved.push(NormalizedObservation {
                    location,
                    date: obs.date,
                    metrics: obs.metrics.clone(),
                }),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            debug!(
                dropped,
                kept = resolved.len(),
                "excluded observations with unrecognized location labels"
            );
        }

        resolved
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

impl Default for LocationNormalizer {
    fn default() -> Self {
        Self::with_builtin_patterns()
    }
}
