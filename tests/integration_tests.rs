//! Integration tests for the portfolio language layer
//!
//! These tests drive whole pages through both initialization phases and the
//! public event API, the way the site runs them in a browser.

use proptest::prelude::*;
use std::collections::BTreeMap;
use tempfile::TempDir;

use portfolio_i18n::browser::{Browser, FileStore, MemoryHistory, MemoryStore, PreferenceStore, UnavailableStore};
use portfolio_i18n::config::Config;
use portfolio_i18n::dom::{Document, ElementSpec, MemoryDocument, NodeId};
use portfolio_i18n::events::PageEvent;
use portfolio_i18n::gesture::PointerKind;
use portfolio_i18n::i18n::{builtin_catalog, CatalogValidator, Language, ITALIAN_STRINGS};
use portfolio_i18n::lifecycle::PageSession;
use portfolio_i18n::resolver::{resolve_initial_language, LanguageSource};
use portfolio_i18n::switcher::SwitchOutcome;
use portfolio_i18n::sync::{ContentSynchronizer, Phase};

// ==================== Test Helpers ====================

const STORAGE_KEY: &str = "giorgio-vigna-lang";

fn museum(original: &str, id: Option<&str>) -> ElementSpec {
    let mut location = ElementSpec::new("span")
        .with_class("museum-location")
        .with_attr("data-original", original)
        .with_text(original);
    if let Some(id) = id {
        location = location.with_attr("data-museum-id", id);
    }
    ElementSpec::new("li").with_class("museum-item").with_child(location)
}

/// The museums page as authored in Italian.
fn museums_page() -> ElementSpec {
    ElementSpec::new("html").with_child(
        ElementSpec::new("body")
            .with_child(ElementSpec::new("div").with_id("navbar-container"))
            .with_child(ElementSpec::new("h1").with_class("page-title").with_text("Musei"))
            .with_child(
                ElementSpec::new("ul")
                    .with_class("museum-list")
                    .with_child(museum("Museum of Arts and Design, New York", Some("mad-new-york")))
                    .with_child(museum("Musée des Arts Décoratifs, Parigi", Some("mad-paris")))
                    .with_child(museum("Museo Civico di Bassano", None)),
            )
            .with_child(
                ElementSpec::new("div")
                    .with_id("biografia-home")
                    .with_child(
                        ElementSpec::new("div").with_class("biography-content").with_children(
                            ITALIAN_STRINGS
                                .biography
                                .iter()
                                .map(|p| ElementSpec::new("p").with_text(p)),
                        ),
                    ),
            )
            .with_child(
                ElementSpec::new("footer")
                    .with_child(ElementSpec::new("span").with_class("footer-country").with_text("Italia")),
            ),
    )
}

/// The shared navigation bar, injected after the first phase.
fn navbar() -> ElementSpec {
    let links = ITALIAN_STRINGS.navigation.iter().map(|label| {
        ElementSpec::new("li").with_child(
            ElementSpec::new("a")
                .with_class("nav-link")
                .with_attr("href", "opere.html")
                .with_text(label),
        )
    });
    ElementSpec::new("nav")
        .with_child(ElementSpec::new("a").with_class("nav-brand").with_text("Giorgio Vigna"))
        .with_child(ElementSpec::new("button").with_class("nav-toggle"))
        .with_child(ElementSpec::new("ul").with_class("nav-menu").with_children(links))
        .with_child(
            ElementSpec::new("div")
                .with_class("language-switch")
                .with_child(ElementSpec::new("button").with_class("lang-btn active").with_attr("data-lang", "it"))
                .with_child(ElementSpec::new("button").with_class("lang-btn").with_attr("data-lang", "en")),
        )
        .with_child(ElementSpec::new("div").with_class("language-switch-mobile"))
}

fn create_session(url: &str, store: impl PreferenceStore + 'static) -> PageSession {
    let browser = Browser::new(
        MemoryDocument::from_spec(&museums_page()),
        store,
        MemoryHistory::parse(url).expect("valid url"),
    );
    PageSession::new(&Config::default(), browser, builtin_catalog())
}

fn start_page(url: &str, store: impl PreferenceStore + 'static) -> PageSession {
    let mut session = create_session(url, store);
    session.init_core();
    let document = session.browser_mut().document.as_mut();
    let container = document.select("#navbar-container").unwrap().unwrap();
    document.append_fragment(container, &navbar()).unwrap();
    session.init_navbar();
    session
}

fn texts(session: &PageSession, css: &str) -> Vec<String> {
    let document = &session.browser().document;
    document
        .select_all(css)
        .unwrap()
        .into_iter()
        .filter_map(|node| document.text(node))
        .collect()
}

fn node(session: &PageSession, css: &str) -> NodeId {
    session.browser().document.select(css).unwrap().unwrap()
}

fn drag(session: &mut PageSession, from: f64, to: f64) {
    let switch = node(session, ".language-switch-mobile");
    session.dispatch(&PageEvent::PointerDown {
        target: switch,
        x: from,
        kind: PointerKind::Touch,
    });
    session.dispatch(&PageEvent::PointerUp {
        target: switch,
        x: to,
        kind: PointerKind::Touch,
    });
}

// ==================== Startup Scenarios ====================

#[test]
fn test_fresh_visit_shows_default_navigation() {
    let session = start_page("https://giorgiovigna.com/musei.html", MemoryStore::new());

    assert_eq!(session.active_language(), Language::Italian);
    assert_eq!(session.browser().document.lang().as_deref(), Some("it"));
    assert_eq!(texts(&session, ".nav-link"), ITALIAN_STRINGS.navigation.to_vec());
    assert_eq!(session.browser().history.location().query(), None);
}

#[test]
fn test_stored_english_preference_applies_on_startup() {
    let store = MemoryStore::new().with(STORAGE_KEY, "en");
    let session = start_page("https://giorgiovigna.com/musei.html", store);

    assert_eq!(session.active_language(), Language::English);
    assert_eq!(session.browser().document.lang().as_deref(), Some("en"));
    assert_eq!(texts(&session, ".page-title"), vec!["Museums"]);
    assert_eq!(texts(&session, ".footer-country"), vec!["Italy"]);
    assert_eq!(texts(&session, ".nav-link")[0], "Works");
}

#[test]
fn test_museum_locations_translate_by_stable_id() {
    let session = start_page("https://giorgiovigna.com/musei.html?lang=en", MemoryStore::new());

    let locations = texts(&session, ".museum-location");
    assert_eq!(locations[0], "Museum of Arts and Design, New York");
    assert_eq!(locations[1], "Museum of Decorative Arts, Paris");
    // No translation for this one; it keeps the Italian name.
    assert_eq!(locations[2], "Museo Civico di Bassano");
}

#[test]
fn test_missing_navbar_degrades_quietly() {
    let mut session = create_session("https://giorgiovigna.com/musei.html?lang=en", MemoryStore::new());
    session.init_core();
    let report = session.init_navbar();

    assert!(report.missing_regions.contains(&"navigation"));
    assert_eq!(texts(&session, ".page-title"), vec!["Museums"]);
}

// ==================== Switching Scenarios ====================

#[test]
fn test_round_trip_restores_original_text() {
    let mut session = start_page("https://giorgiovigna.com/musei.html", MemoryStore::new());
    let before = session.browser().document.snapshot();

    assert_eq!(session.switch_language("en"), SwitchOutcome::Switched(Language::English));
    assert_ne!(session.browser().document.snapshot(), before);
    assert_eq!(session.switch_language("it"), SwitchOutcome::Switched(Language::Italian));

    let locations = texts(&session, ".museum-location");
    let originals: Vec<String> = session
        .browser()
        .document
        .select_all(".museum-location")
        .unwrap()
        .into_iter()
        .filter_map(|n| session.browser().document.attribute(n, "data-original"))
        .collect();
    assert_eq!(locations, originals);
    assert_eq!(texts(&session, ".nav-link"), ITALIAN_STRINGS.navigation.to_vec());
    assert_eq!(texts(&session, ".biography-content p"), ITALIAN_STRINGS.biography.to_vec());
    assert_eq!(session.browser().history.location().query(), None);
}

#[test]
fn test_redundant_default_switch_changes_nothing() {
    let mut session = start_page("https://giorgiovigna.com/musei.html", MemoryStore::new());
    let before = session.browser().document.snapshot();

    assert_eq!(session.switch_language("it"), SwitchOutcome::Unchanged);
    assert_eq!(session.switch_language("it"), SwitchOutcome::Unchanged);
    assert_eq!(session.browser().document.snapshot(), before);
}

#[test]
fn test_switch_with_storage_disabled_still_translates() {
    let mut session = start_page("https://giorgiovigna.com/musei.html", UnavailableStore);
    let en = session.browser().document.select_all(".lang-btn").unwrap()[1];

    session.dispatch(&PageEvent::click(en));

    assert_eq!(session.active_language(), Language::English);
    assert_eq!(texts(&session, ".page-title"), vec!["Museums"]);
    assert_eq!(session.browser().history.location().query(), Some("lang=en"));
}

#[test]
fn test_drag_threshold_boundary() {
    let mut session = start_page("https://giorgiovigna.com/musei.html", MemoryStore::new());

    drag(&mut session, 50.0, 69.0);
    assert_eq!(session.active_language(), Language::Italian);

    drag(&mut session, 50.0, 71.0);
    assert_eq!(session.active_language(), Language::English);
    assert_eq!(session.browser().history.location().query(), Some("lang=en"));

    // Rightward again from English is the wrong direction.
    drag(&mut session, 50.0, 200.0);
    assert_eq!(session.active_language(), Language::English);
}

// ==================== Persistence Tests ====================

#[test]
fn test_file_store_carries_preference_across_pages() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("prefs").join("preferences.json");

    let mut first = start_page("https://giorgiovigna.com/musei.html", FileStore::new(&path));
    first.switch_language("en");

    let second = start_page("https://giorgiovigna.com/opere.html", FileStore::new(&path));
    assert_eq!(second.active_language(), Language::English);
    assert!(std::fs::read_to_string(&path).unwrap().contains("\"en\""));
}

#[test]
fn test_admin_session_survives_reload() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("preferences.json");

    let mut page = start_page("https://giorgiovigna.com/musei.html", FileStore::new(&path));
    let fields = BTreeMap::from([
        ("username".to_string(), "admin".to_string()),
        ("password".to_string(), "vigna2024".to_string()),
    ]);
    let body = page.browser().document.body().unwrap();
    let form = page.browser_mut().document.create_element(body, "form").unwrap();
    page.browser_mut().document.set_attribute(form, "id", "admin-login").unwrap();
    page.dispatch(&PageEvent::Submit { target: form, fields });

    let reloaded = start_page("https://giorgiovigna.com/musei.html", FileStore::new(&path));
    let document = &reloaded.browser().document;
    assert!(document.has_class(document.body().unwrap(), "edit-mode"));
}

// ==================== Catalog Tests ====================

#[test]
fn test_builtin_catalog_validates_clean() {
    let report = CatalogValidator::validate(&builtin_catalog());
    assert!(report.is_clean(), "{:?}", report);
}

// ==================== Properties ====================

fn any_language() -> impl Strategy<Value = Language> {
    prop_oneof![Just(Language::Italian), Just(Language::English)]
}

fn url_with(lang: Option<&str>) -> url::Url {
    let mut url = url::Url::parse("https://giorgiovigna.com/musei.html").unwrap();
    if let Some(code) = lang {
        url.query_pairs_mut().append_pair("lang", code);
    }
    url
}

proptest! {
    #[test]
    fn prop_url_parameter_wins(url_lang in any_language(), stored in proptest::option::of(any_language())) {
        let mut store = MemoryStore::new();
        if let Some(stored) = stored {
            store = store.with(STORAGE_KEY, stored.code());
        }
        let (language, source) = resolve_initial_language(&url_with(Some(url_lang.code())), &store, "lang", STORAGE_KEY);
        prop_assert_eq!(language, url_lang);
        prop_assert_eq!(source, LanguageSource::Url);
    }

    #[test]
    fn prop_storage_used_without_parameter(stored in proptest::option::of("[a-z]{0,3}")) {
        let mut store = MemoryStore::new();
        if let Some(code) = &stored {
            store = store.with(STORAGE_KEY, code);
        }
        let expected = stored
            .as_deref()
            .and_then(Language::from_code)
            .unwrap_or(Language::DEFAULT);

        let (language, _) = resolve_initial_language(&url_with(None), &store, "lang", STORAGE_KEY);
        prop_assert_eq!(language, expected);
    }

    #[test]
    fn prop_invalid_codes_change_nothing(code in "[a-zA-Z]{0,4}") {
        prop_assume!(Language::from_code(&code).is_none());
        let mut session = start_page("https://giorgiovigna.com/musei.html", MemoryStore::new());
        let before = session.browser().document.snapshot();

        prop_assert_eq!(session.switch_language(&code), SwitchOutcome::Rejected);
        prop_assert_eq!(session.active_language(), Language::Italian);
        prop_assert_eq!(session.browser().document.snapshot(), before);
    }

    #[test]
    fn prop_resync_is_stable(language in any_language()) {
        let mut session = start_page("https://giorgiovigna.com/musei.html", MemoryStore::new());
        session.switch_language(language.code());
        let first = session.browser().document.snapshot();

        let report = ContentSynchronizer::default().apply_language(
            session.browser_mut().document.as_mut(),
            &builtin_catalog(),
            language,
            "musei",
            Phase::Full,
        );

        prop_assert_eq!(report.updated, 0);
        prop_assert_eq!(session.browser().document.snapshot(), first);
    }

    #[test]
    fn prop_drag_switches_only_past_threshold(distance in 0.0f64..60.0) {
        let mut session = start_page("https://giorgiovigna.com/musei.html", MemoryStore::new());
        drag(&mut session, 0.0, distance);

        let expected = if distance > 20.0 { Language::English } else { Language::Italian };
        prop_assert_eq!(session.active_language(), expected);
    }
}
