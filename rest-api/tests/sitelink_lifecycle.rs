//! Sitelink use cases end to end against the in-memory repository.

use std::sync::Arc;

use serde_json::json;

use kb_rest_api::config::{BadgeConfig, SiteConfig, SiteRegistry, ValidationConfig};
use kb_rest_api::domain::{
    EditSummary, Item, ItemId, SiteId, SitelinkEditSummary, Term, TermList,
};
use kb_rest_api::test_support::{AcceptingTitleResolver, InMemoryItemRepository};
use kb_rest_api::usecases::{
    AssertItemExists, ErrorCode, ExecutionError, PatchSitelinks, PatchSitelinksRequest,
    RemoveSitelink, RemoveSitelinkRequest, SetSitelink, SetSitelinkRequest,
    SitelinkEditDeserializer,
};
use kb_rest_api::validation::{SitelinkValidator, SitelinksValidator};

fn item_id(id: &str) -> ItemId {
    ItemId::new(id).expect("valid item id")
}

fn site(id: &str) -> SiteId {
    SiteId::new(id).expect("valid site id")
}

fn config() -> Arc<ValidationConfig> {
    let registry = SiteRegistry::new([
        (
            site("enwiki"),
            SiteConfig {
                article_url_pattern: "https://en.wikipedia.org/wiki/$1".to_owned(),
            },
        ),
        (
            site("dewiki"),
            SiteConfig {
                article_url_pattern: "https://de.wikipedia.org/wiki/$1".to_owned(),
            },
        ),
    ]);
    Arc::new(ValidationConfig::new(
        ["en".to_owned()],
        registry,
        BadgeConfig::new(
            [item_id("Q567"), item_id("Q17")],
            [],
        ),
    ))
}

struct Fixture {
    repository: Arc<InMemoryItemRepository>,
    config: Arc<ValidationConfig>,
}

impl Fixture {
    fn new() -> Self {
        let repository = Arc::new(InMemoryItemRepository::new());
        let labels: TermList = [Term::new("en", "potato")].into_iter().collect();
        repository.add_item(Item {
            labels,
            ..Item::default()
        }
        .with_id(item_id("Q1")));
        Self {
            repository,
            config: config(),
        }
    }

    fn set_sitelink(&self) -> SetSitelink {
        let validator = SitelinkValidator::new(
            Arc::clone(&self.config),
            Arc::new(AcceptingTitleResolver),
            Arc::clone(&self.repository) as Arc<_>,
        );
        SetSitelink::new(
            Arc::clone(&self.config),
            AssertItemExists::new(Arc::clone(&self.repository) as Arc<_>),
            SitelinkEditDeserializer::new(validator),
            Arc::clone(&self.repository) as Arc<_>,
            Arc::clone(&self.repository) as Arc<_>,
        )
    }

    fn remove_sitelink(&self) -> RemoveSitelink {
        RemoveSitelink::new(
            Arc::clone(&self.config),
            AssertItemExists::new(Arc::clone(&self.repository) as Arc<_>),
            Arc::clone(&self.repository) as Arc<_>,
            Arc::clone(&self.repository) as Arc<_>,
        )
    }

    fn patch_sitelinks(&self) -> PatchSitelinks {
        let validator = SitelinksValidator::new(
            Arc::clone(&self.config),
            Arc::new(AcceptingTitleResolver),
            Arc::clone(&self.repository) as Arc<_>,
        );
        PatchSitelinks::new(
            AssertItemExists::new(Arc::clone(&self.repository) as Arc<_>),
            validator,
            Arc::clone(&self.repository) as Arc<_>,
            Arc::clone(&self.repository) as Arc<_>,
        )
    }
}

fn set_request(sitelink: serde_json::Value) -> SetSitelinkRequest {
    SetSitelinkRequest {
        item_id: "Q1".to_owned(),
        site_id: "enwiki".to_owned(),
        sitelink,
        tags: Vec::new(),
        is_bot: false,
        comment: None,
        username: None,
    }
}

fn expect_code(error: ExecutionError) -> ErrorCode {
    match error {
        ExecutionError::UseCase(error) => error.code(),
        ExecutionError::ItemRedirect { .. } => panic!("expected a use-case error"),
    }
}

#[tokio::test]
async fn setting_then_rebadging_a_sitelink_distinguishes_add_from_badge_edit() {
    let fixture = Fixture::new();
    let use_case = fixture.set_sitelink();

    let first = use_case
        .execute(set_request(json!({ "title": "Potato", "badges": ["Q567"] })))
        .await
        .expect("first set succeeds");
    assert!(!first.was_replaced);
    assert_eq!(first.sitelink.url(), "https://en.wikipedia.org/wiki/Potato");
    assert!(matches!(
        fixture.repository.last_edit().expect("edit recorded").summary,
        EditSummary::Sitelink(SitelinkEditSummary::Add { .. })
    ));

    let second = use_case
        .execute(set_request(json!({ "title": "Potato", "badges": ["Q17"] })))
        .await
        .expect("second set succeeds");
    assert!(second.was_replaced);
    assert!(matches!(
        fixture.repository.last_edit().expect("edit recorded").summary,
        EditSummary::Sitelink(SitelinkEditSummary::SetBadges { .. })
    ));

    let stored = fixture
        .repository
        .stored_item(&item_id("Q1"))
        .expect("item stored");
    assert_eq!(
        stored
            .sitelinks
            .sitelink(&site("enwiki"))
            .expect("sitelink stored")
            .badges(),
        [item_id("Q17")]
    );
}

#[tokio::test]
async fn setting_the_identical_sitelink_twice_succeeds_and_reports_a_replace() {
    let fixture = Fixture::new();
    let use_case = fixture.set_sitelink();
    let payload = json!({ "title": "Potato", "badges": ["Q567"] });

    let first = use_case
        .execute(set_request(payload.clone()))
        .await
        .expect("first set succeeds");
    let second = use_case
        .execute(set_request(payload))
        .await
        .expect("second set succeeds");

    assert!(!first.was_replaced);
    assert!(second.was_replaced);
    assert_eq!(second.sitelink, first.sitelink);
}

#[tokio::test]
async fn a_sitelink_used_by_another_item_is_a_conflict() {
    let fixture = Fixture::new();
    let mut other = Item::default().with_id(item_id("Q2"));
    other.sitelinks.set(kb_rest_api::domain::SiteLink::new(
        site("enwiki"),
        "Potato",
        Vec::new(),
        "https://en.wikipedia.org/wiki/Potato",
    ));
    fixture.repository.add_item(other);

    let error = fixture
        .set_sitelink()
        .execute(set_request(json!({ "title": "Potato" })))
        .await
        .expect_err("conflicting sitelink");
    assert_eq!(expect_code(error), ErrorCode::SitelinkConflict);
}

#[tokio::test]
async fn removing_a_sitelink_deletes_it_and_records_the_edit() {
    let fixture = Fixture::new();
    fixture
        .set_sitelink()
        .execute(set_request(json!({ "title": "Potato" })))
        .await
        .expect("set succeeds");

    fixture
        .remove_sitelink()
        .execute(RemoveSitelinkRequest {
            item_id: "Q1".to_owned(),
            site_id: "enwiki".to_owned(),
            tags: Vec::new(),
            is_bot: false,
            comment: None,
            username: None,
        })
        .await
        .expect("removal succeeds");

    let stored = fixture
        .repository
        .stored_item(&item_id("Q1"))
        .expect("item stored");
    assert!(stored.sitelinks.is_empty());
    assert!(matches!(
        fixture.repository.last_edit().expect("edit recorded").summary,
        EditSummary::Sitelink(SitelinkEditSummary::Remove { .. })
    ));
}

#[tokio::test]
async fn patching_sitelinks_adds_an_entry_with_a_derived_url() {
    let fixture = Fixture::new();
    fixture
        .set_sitelink()
        .execute(set_request(json!({ "title": "Potato" })))
        .await
        .expect("set succeeds");

    let response = fixture
        .patch_sitelinks()
        .execute(PatchSitelinksRequest {
            item_id: "Q1".to_owned(),
            patch: json!([
                { "op": "test", "path": "/enwiki/title", "value": "Potato" },
                { "op": "add", "path": "/dewiki", "value": { "title": "Kartoffel" } },
            ]),
            tags: Vec::new(),
            is_bot: false,
            comment: None,
            username: None,
        })
        .await
        .expect("patch applies");
    assert_eq!(
        response
            .sitelinks
            .sitelink(&site("dewiki"))
            .expect("entry present")
            .url(),
        "https://de.wikipedia.org/wiki/Kartoffel"
    );
}

#[tokio::test]
async fn operations_on_a_redirected_item_report_the_redirect() {
    let fixture = Fixture::new();
    fixture.repository.add_redirect(item_id("Q9"), item_id("Q1"));
    let mut request = set_request(json!({ "title": "Potato" }));
    request.item_id = "Q9".to_owned();

    let error = fixture
        .set_sitelink()
        .execute(request)
        .await
        .expect_err("redirected item");
    assert_eq!(
        error,
        ExecutionError::ItemRedirect {
            target: item_id("Q1")
        }
    );
}
