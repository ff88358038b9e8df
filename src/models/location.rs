use serde::{Deserialize, Serialize};
use std::fmt;

/// A canonical location entity. Equality is on the (city, country) pair,
/// never on the raw label that produced it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CanonicalLocation {
    pub city: String,
    pub country: String,
}

impl CanonicalLocation {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
        }
    }
}

impl fmt::Display for CanonicalLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.country)
    }
}
