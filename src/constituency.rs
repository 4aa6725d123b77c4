//! Constituency references.
//!
//! A [`ConstituencyRef`] pairs a stable GSS-style code with a display name.
//! Refs are derived by de-duplicating dataset rows, one per distinct code,
//! ordered lexicographically by name for display.
//!
//! A ref decoded from a URL before the dataset has loaded is *provisional*:
//! only the code is known, so the code stands in for the name until the
//! one-time resolution step replaces it.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static CODE_SHAPE: OnceLock<Regex> = OnceLock::new();

fn code_shape() -> &'static Regex {
    // GSS constituency codes: country letter + eight digits, e.g. E14001234.
    CODE_SHAPE.get_or_init(|| Regex::new(r"^[ENSW]\d{8}$").expect("static regex is valid"))
}

/// One of the 650 electoral constituencies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstituencyRef {
    /// Stable identifier (GSS code).
    pub code: String,
    /// Display name.
    pub name: String,
}

impl ConstituencyRef {
    /// Creates a fully-resolved reference.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Creates a provisional reference from a bare code.
    ///
    /// Used when decoding a URL before the dataset is available: the code
    /// doubles as the name until resolution.
    #[must_use]
    pub fn provisional(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            name: code.clone(),
            code,
        }
    }

    /// True if this ref still carries the placeholder signature
    /// (`code == name`).
    #[must_use]
    pub fn is_provisional(&self) -> bool {
        self.code == self.name
    }

    /// True if the code looks like a GSS constituency code.
    #[must_use]
    pub fn code_is_well_formed(&self) -> bool {
        code_is_well_formed(&self.code)
    }
}

impl std::fmt::Display for ConstituencyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// Shape check for GSS constituency codes.
#[must_use]
pub fn code_is_well_formed(code: &str) -> bool {
    code_shape().is_match(code)
}
