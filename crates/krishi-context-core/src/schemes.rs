//! Government scheme matching.
//!
//! A scheme is kept when it applies to the requested state and looks
//! agriculture-related. Matching is deliberately crop-agnostic: the
//! requested crop names are attached to every match but never used to
//! filter.

use std::collections::HashSet;

use crate::extract::truncate_chars;
use crate::models::{MatchedScheme, SchemeRecord};

/// Columns tried, in order, to resolve a scheme's name. The second entry
/// is a misspelling present in some upstream exports.
pub const SCHEME_NAME_FIELDS: [&str; 3] = ["schemename", "schemanme", "schemeshorttitle"];

/// Name used when no candidate column has a value; such schemes are dropped.
pub const UNKNOWN_SCHEME: &str = "Unknown";

/// Terms that mark a scheme as agriculture-related.
pub const AGRICULTURE_KEYWORDS: [&str; 10] = [
    "farmer",
    "agriculture",
    "cultivation",
    "crop",
    "farm",
    "subsidy",
    "loan",
    "credit",
    "support",
    "assistance",
];

/// Prefix accepted as a state match regardless of the requested state.
///
/// Covers "Uttarakhand" appearing truncated or prefixed in source data. It
/// also matches any other state containing the substring.
pub const UTTAR_PREFIX: &str = "uttar";

pub const DEFAULT_STATE: &str = "Uttarakhand";
pub const MAX_SCHEMES: usize = 20;
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// Resolve a scheme's display name through [`SCHEME_NAME_FIELDS`].
pub fn resolve_scheme_name(scheme: &SchemeRecord) -> &str {
    SCHEME_NAME_FIELDS
        .iter()
        .filter_map(|field| scheme.field(field))
        .find(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_SCHEME)
}

/// Whether the scheme's state list covers `state`.
pub fn applies_to_state(scheme: &SchemeRecord, state: &str) -> bool {
    let states = scheme.beneficiarystate.to_lowercase();
    states.contains(&state.to_lowercase()) || states.contains("all") || states.contains(UTTAR_PREFIX)
}

/// Whether the scheme's audience or description mentions agriculture.
pub fn is_agricultural(scheme: &SchemeRecord) -> bool {
    let scheme_for = scheme.schemefor.to_lowercase();
    let description = scheme.briefdescription.to_lowercase();
    AGRICULTURE_KEYWORDS
        .iter()
        .any(|term| scheme_for.contains(term) || description.contains(term))
}

/// Match schemes for a state, deduplicated by resolved name (first
/// occurrence wins) and capped at [`MAX_SCHEMES`].
pub fn match_schemes(
    schemes: &[SchemeRecord],
    crop_names: &[String],
    state: &str,
) -> Vec<MatchedScheme> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut matched = Vec::new();

    for scheme in schemes {
        if matched.len() >= MAX_SCHEMES {
            break;
        }
        if !applies_to_state(scheme, state) {
            continue;
        }
        let name = resolve_scheme_name(scheme);
        if name == UNKNOWN_SCHEME || !is_agricultural(scheme) {
            continue;
        }
        if !seen.insert(name) {
            continue;
        }

        let short_title = if scheme.schemeshorttitle.is_empty() {
            name.to_string()
        } else {
            scheme.schemeshorttitle.clone()
        };

        matched.push(MatchedScheme {
            name: name.to_string(),
            short_title,
            description: truncate_chars(&scheme.briefdescription, DESCRIPTION_MAX_CHARS),
            category: scheme.schemecategory.clone(),
            ministry: scheme.nodalministryname.clone(),
            applicable_crops: crop_names.to_vec(),
        });
    }

    tracing::debug!(
        candidates = schemes.len(),
        matched = matched.len(),
        state,
        "matched schemes"
    );
    matched
}
