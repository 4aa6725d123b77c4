//! Selection state and its URL query-string representation.
//!
//! The state is the tuple {selected constituency, selected provision ids,
//! selected year}. It is kept consistent with exactly one authoritative
//! query-string encoding via the pure [`SelectionState::from_query`] /
//! [`SelectionState::to_query`] pair; mutation goes through the store in
//! [`crate::store`], never through shared globals.
//!
//! Invariant: the selected provision set is always a subset of the catalog.
//! Unknown ids arriving from a URL are dropped silently at ingestion.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::ProvisionId;
use crate::constituency::ConstituencyRef;
use crate::dataset::ImpactDataset;
use crate::error::ValidationError;

/// A projection year in the supported range [2026, 2031).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Year(u16);

impl Year {
    /// First supported year (inclusive).
    pub const MIN: u16 = 2026;
    /// End of the supported range (exclusive).
    pub const MAX_EXCLUSIVE: u16 = 2031;
    /// The year shown when nothing is selected.
    pub const DEFAULT: Self = Self(2029);

    /// Creates a year, checking the supported range.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::YearOutOfRange` outside [2026, 2031).
    pub fn new(year: u16) -> Result<Self, ValidationError> {
        if year < Self::MIN || year >= Self::MAX_EXCLUSIVE {
            return Err(ValidationError::YearOutOfRange {
                year: i64::from(year),
                min: Self::MIN,
                max: Self::MAX_EXCLUSIVE,
            });
        }
        Ok(Self(year))
    }

    /// The numeric year.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// All supported years in ascending order.
    pub fn supported() -> impl Iterator<Item = Self> {
        (Self::MIN..Self::MAX_EXCLUSIVE).map(Self)
    }
}

impl Default for Year {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The user's current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Selected constituency, if any. May be provisional until the dataset
    /// loads (see [`SelectionState::resolve_constituency`]).
    pub constituency: Option<ConstituencyRef>,
    /// Toggled provisions. Always a subset of the catalog; iteration order
    /// is catalog order.
    pub policies: BTreeSet<ProvisionId>,
    /// Selected projection year. Not part of the URL representation.
    pub year: Year,
}

impl Default for SelectionState {
    /// The state used when no URL parameters are present: every provision
    /// selected, no constituency, year 2029.
    fn default() -> Self {
        Self {
            constituency: None,
            policies: ProvisionId::ALL.into_iter().collect(),
            year: Year::DEFAULT,
        }
    }
}

impl SelectionState {
    /// Decodes a query string (with or without a leading `?`).
    ///
    /// `policies` is a comma-separated id list; ids resolve through the
    /// catalog (canonical slugs and known aliases) and unknown ids are
    /// dropped, not errored. `constituency` is a single code, stored as a
    /// provisional ref because names are not resolvable before the dataset
    /// loads. Absent parameters fall back to the defaults.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut state = Self::default();

        for (key, value) in query_pairs(query) {
            match key {
                "policies" => {
                    state.policies = value
                        .split(',')
                        .filter(|id| !id.is_empty())
                        .filter_map(ProvisionId::resolve)
                        .collect();
                }
                "constituency" => {
                    if !value.is_empty() {
                        state.constituency = Some(ConstituencyRef::provisional(value));
                    }
                }
                _ => {}
            }
        }

        state
    }

    /// Encodes the state as the authoritative query string.
    ///
    /// `policies` is emitted comma-joined only when non-empty and
    /// `constituency` only when selected; keys are omitted entirely
    /// otherwise. As a consequence an empty policy selection is not
    /// representable in the URL and decodes back to the default full set.
    /// The caller replaces the current URL in place (no history entry).
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut parts = Vec::new();

        if !self.policies.is_empty() {
            let ids: Vec<&str> = self.policies.iter().map(|p| p.as_str()).collect();
            parts.push(format!("policies={}", ids.join(",")));
        }
        if let Some(constituency) = &self.constituency {
            parts.push(format!("constituency={}", constituency.code));
        }

        parts.join("&")
    }

    /// One-time constituency name resolution.
    ///
    /// If the current ref still carries the provisional signature and the
    /// dataset knows its code, it is replaced with the resolved pair.
    /// Returns true if a replacement happened.
    pub fn resolve_constituency(&mut self, dataset: &ImpactDataset) -> bool {
        let Some(current) = &self.constituency else {
            return false;
        };
        if !current.is_provisional() {
            return false;
        }
        if let Some(resolved) = dataset.constituency_by_code(&current.code) {
            self.constituency = Some(resolved.clone());
            return true;
        }
        false
    }

    /// True if the given provision is toggled on.
    #[must_use]
    pub fn is_selected(&self, id: ProvisionId) -> bool {
        self.policies.contains(&id)
    }
}

/// Splits a query string into key/value pairs. Pairs without `=` decode as
/// an empty value.
fn query_pairs(query: &str) -> impl Iterator<Item = (&str, &str)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
}
