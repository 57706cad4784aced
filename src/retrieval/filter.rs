use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::retrieval::{CRITERION_EVEN, CRITERION_ODD};
use crate::data::SourceRecord;
use crate::errors::RosterError;

/// Recognized filter criteria.
///
/// New criteria extend this enum; call sites only ever go through `matches`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterCriterion {
    /// Keep records whose identifier is even.
    Even,
    /// Keep records whose identifier is odd.
    Odd,
}

impl FilterCriterion {
    /// Pure predicate: does `record` satisfy this criterion?
    pub fn matches<R: SourceRecord>(self, record: &R) -> bool {
        let even = record.record_id() % 2 == 0;
        even == (self == FilterCriterion::Even)
    }

    /// Query-string spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterCriterion::Even => CRITERION_EVEN,
            FilterCriterion::Odd => CRITERION_ODD,
        }
    }
}

impl fmt::Display for FilterCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterCriterion {
    type Err = RosterError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        if value.eq_ignore_ascii_case(CRITERION_EVEN) {
            Ok(FilterCriterion::Even)
        } else if value.eq_ignore_ascii_case(CRITERION_ODD) {
            Ok(FilterCriterion::Odd)
        } else {
            Err(RosterError::InvalidRequest(format!(
                "unrecognized filter criterion '{raw}' (expected '{CRITERION_EVEN}' or '{CRITERION_ODD}')"
            )))
        }
    }
}
