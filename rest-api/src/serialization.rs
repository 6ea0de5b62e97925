//! Converters from domain values back into their JSON serializations.
//!
//! The patch use cases round-trip through these: serialize the stored state,
//! apply the patch, then re-validate the result. The output must therefore
//! match the shape the validators accept.

use serde_json::{json, Map, Value};

use crate::domain::{AliasGroupList, SiteLinkList};

/// Serialize a sitelink list as a `{site: {title, badges, url}}` mapping.
#[must_use]
pub fn sitelinks_to_value(sitelinks: &SiteLinkList) -> Value {
    let mut entries = Map::new();
    for sitelink in sitelinks.iter() {
        let badges: Vec<&str> = sitelink.badges().iter().map(|b| b.as_str()).collect();
        entries.insert(
            sitelink.site().as_str().to_owned(),
            json!({
                "title": sitelink.title(),
                "badges": badges,
                "url": sitelink.url(),
            }),
        );
    }
    Value::Object(entries)
}

/// Serialize alias groups as a `{language: [alias, ...]}` mapping.
#[must_use]
pub fn aliases_to_value(aliases: &AliasGroupList) -> Value {
    let mut entries = Map::new();
    for (language, group) in aliases.iter() {
        entries.insert(language.to_owned(), json!(group));
    }
    Value::Object(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AliasGroup, ItemId, SiteId, SiteLink};
    use serde_json::json;

    #[test]
    fn sitelinks_serialize_with_badges_and_url() {
        let mut sitelinks = SiteLinkList::new();
        sitelinks.set(SiteLink::new(
            SiteId::new("enwiki").expect("valid site id"),
            "Potato",
            vec![ItemId::new("Q567").expect("valid item id")],
            "https://en.wikipedia.org/wiki/Potato",
        ));

        assert_eq!(
            sitelinks_to_value(&sitelinks),
            json!({
                "enwiki": {
                    "title": "Potato",
                    "badges": ["Q567"],
                    "url": "https://en.wikipedia.org/wiki/Potato",
                }
            })
        );
    }

    #[test]
    fn alias_groups_serialize_per_language() {
        let aliases: AliasGroupList = [
            AliasGroup::new("en", vec!["spud".to_owned()]),
            AliasGroup::new("de", vec!["Erdapfel".to_owned()]),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            aliases_to_value(&aliases),
            json!({ "de": ["Erdapfel"], "en": ["spud"] })
        );
    }
}
