//! Diffing of patched serializations against their originals.
//!
//! The patch use cases only re-run external checks (title resolution,
//! conflict lookups) for entries the patch actually changed. These helpers
//! compute that set from the original and patched JSON, so they stay pure
//! and independent of how the patch was expressed.

use serde_json::Value;

use crate::domain::SiteId;

/// Sites whose sitelink entry differs between the two serializations.
///
/// An entry counts as modified when it is new, its title changed, or its
/// badges changed; an absent badge list compares equal to an empty one. The
/// `url` key is ignored here, it is checked separately because clients must
/// not modify it. Removed sites are not reported, removal needs no external
/// checks.
#[must_use]
pub fn modified_sitelink_sites(original: &Value, patched: &Value) -> Vec<SiteId> {
    let Some(patched_entries) = patched.as_object() else {
        return Vec::new();
    };

    let mut modified = Vec::new();
    for (site, entry) in patched_entries {
        let Ok(site) = SiteId::new(site.as_str()) else {
            // Invalid keys are rejected by validation, not diffed.
            continue;
        };
        let before = original.get(site.as_str());
        if before.is_none_or(|before| sitelink_differs(before, entry)) {
            modified.push(site);
        }
    }
    modified
}

fn sitelink_differs(before: &Value, after: &Value) -> bool {
    const EMPTY_BADGES: &Value = &Value::Array(Vec::new());

    if before.get("title") != after.get("title") {
        return true;
    }
    let before_badges = before.get("badges").unwrap_or(EMPTY_BADGES);
    let after_badges = after.get("badges").unwrap_or(EMPTY_BADGES);
    before_badges != after_badges
}

/// Languages whose alias list differs between the two serializations.
///
/// Reported for new and changed languages; removed languages need no
/// re-validation.
#[must_use]
pub fn modified_alias_languages(original: &Value, patched: &Value) -> Vec<String> {
    let Some(patched_entries) = patched.as_object() else {
        return Vec::new();
    };

    patched_entries
        .iter()
        .filter(|(language, aliases)| original.get(language.as_str()) != Some(aliases))
        .map(|(language, _)| language.clone())
        .collect()
}
