//! Place-of-supply lookup.
//!
//! Sales reports name the destination state in plain text; the return wants
//! the two-digit GST state code. The table is read-only and sorted by name
//! so lookups are a binary search.

use std::fmt;

use serde::{Deserialize, Serialize};

/// State names (upper case) and their GST state codes, sorted by name.
static STATE_CODES: &[(&str, &str)] = &[
    ("ANDAMAN & NICOBAR ISLANDS", "35"),
    ("ANDHRA PRADESH", "37"),
    ("ARUNACHAL PRADESH", "12"),
    ("ASSAM", "18"),
    ("BIHAR", "10"),
    ("CHANDIGARH", "04"),
    ("CHHATTISGARH", "22"),
    ("DADRA & NAGAR HAVELI & DAMAN & DIU", "26"),
    ("DAMAN & DIU", "25"),
    ("DELHI", "07"),
    ("GOA", "30"),
    ("GUJARAT", "24"),
    ("HARYANA", "06"),
    ("HIMACHAL PRADESH", "02"),
    ("JAMMU & KASHMIR", "01"),
    ("JHARKHAND", "20"),
    ("KARNATAKA", "29"),
    ("KERALA", "32"),
    ("LADAKH", "38"),
    ("LAKSHADWEEP", "31"),
    // Misspelling carried by older marketplace exports.
    ("LAKSHDWEEP", "31"),
    ("MADHYA PRADESH", "23"),
    ("MAHARASHTRA", "27"),
    ("MANIPUR", "14"),
    ("MEGHALAYA", "17"),
    ("MIZORAM", "15"),
    ("NAGALAND", "13"),
    ("ODISHA", "21"),
    ("OTHER TERRITORY", "97"),
    ("PUDUCHERRY", "34"),
    ("PUNJAB", "03"),
    ("RAJASTHAN", "08"),
    ("SIKKIM", "11"),
    ("TAMIL NADU", "33"),
    ("TELANGANA", "36"),
    ("TRIPURA", "16"),
    ("UTTAR PRADESH", "09"),
    ("UTTARAKHAND", "05"),
    ("WEST BENGAL", "19"),
];

/// Looks up the state code for a state name.
///
/// Matching ignores case and surrounding whitespace.
#[must_use]
pub fn lookup(state_name: &str) -> Option<&'static str> {
    let needle = state_name.trim().to_uppercase();
    STATE_CODES
        .binary_search_by(|(name, _)| (*name).cmp(needle.as_str()))
        .ok()
        .map(|idx| STATE_CODES[idx].1)
}

/// Resolves a state name to its code, or `fallback` when it is unknown.
#[must_use]
pub fn pos_code<'a>(state_name: &str, fallback: &'a str) -> &'a str {
    lookup(state_name).unwrap_or(fallback)
}

/// Whether a supply stays inside the filer's home state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SupplyType {
    /// Intra-state: taxed as CGST + SGST.
    Intra,
    /// Inter-state: taxed as IGST.
    Inter,
}

impl SupplyType {
    /// Classifies a place of supply against the home state code.
    #[must_use]
    pub fn for_pos(pos: &str, home_state_code: &str) -> Self {
        if pos == home_state_code {
            Self::Intra
        } else {
            Self::Inter
        }
    }

    /// Multiplier turning the row's single-component rate into the line rate.
    ///
    /// Intra-state rows state the CGST rate only; SGST is levied at the same
    /// rate, so the combined rate is double.
    #[must_use]
    pub const fn rate_multiplier(self) -> u32 {
        match self {
            Self::Intra => 200,
            Self::Inter => 100,
        }
    }
}

impl fmt::Display for SupplyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intra => write!(f, "INTRA"),
            Self::Inter => write!(f, "INTER"),
        }
    }
}
