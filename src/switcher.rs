//! Language switch controller: owner of the active language.
//!
//! The controller is the only writer of the active language. Every change
//! keeps four things in step: the in-memory state, the document's `lang`
//! attribute, the stored preference, and the `lang` query parameter.

use crate::browser::{page_slug, with_query_param, Browser};
use crate::dom::Document;
use crate::i18n::{Catalog, Language};
use crate::resolver::{resolve_initial_language, LanguageSource};
use crate::sync::{ContentSynchronizer, Phase, SyncReport};
use tracing::{debug, info, warn};

/// Language buttons; each carries its code in `data-lang`.
pub const LANG_BUTTON_SELECTOR: &str = ".lang-btn";

/// Sliding toggles, desktop and mobile.
pub const LANG_SWITCH_SELECTOR: &str = ".language-switch, .language-switch-mobile";

pub const ACTIVE_CLASS: &str = "active";

/// Result of a switch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    Switched(Language),
    /// Already showing the requested language
    Unchanged,
    /// The requested code is not a supported language
    Rejected,
}

/// Keys under which the language is carried in the URL and in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageKeys {
    pub query_param: String,
    pub storage_key: String,
}

impl Default for LanguageKeys {
    fn default() -> Self {
        Self {
            query_param: "lang".to_string(),
            storage_key: "giorgio-vigna-lang".to_string(),
        }
    }
}

pub struct LanguageController {
    catalog: Catalog,
    synchronizer: ContentSynchronizer,
    keys: LanguageKeys,
    active: Language,
}

impl LanguageController {
    pub fn new(catalog: Catalog, synchronizer: ContentSynchronizer, keys: LanguageKeys) -> Self {
        Self {
            catalog,
            synchronizer,
            keys,
            active: Language::DEFAULT,
        }
    }

    /// The language currently displayed.
    pub fn active(&self) -> Language {
        self.active
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn keys(&self) -> &LanguageKeys {
        &self.keys
    }

    /// Resolve the initial language and adopt it without persisting it.
    pub fn initialize(&mut self, browser: &mut Browser) -> (Language, LanguageSource) {
        let (language, source) = resolve_initial_language(
            browser.history.location(),
            browser.store.as_ref(),
            &self.keys.query_param,
            &self.keys.storage_key,
        );
        info!("Initial language '{}' (from {:?})", language, source);

        self.active = language;
        set_document_lang(browser.document.as_mut(), language);
        (language, source)
    }

    /// Re-apply the active language to the page.
    ///
    /// Safe to call any number of times; a pass over already-correct content
    /// changes nothing. A full pass also refreshes the active indicators.
    pub fn render(&self, browser: &mut Browser, phase: Phase) -> SyncReport {
        let slug = page_slug(browser.history.location());
        let report = self.synchronizer.apply_language(
            browser.document.as_mut(),
            &self.catalog,
            self.active,
            &slug,
            phase,
        );
        if phase == Phase::Full {
            update_indicators(browser.document.as_mut(), self.active);
        }
        report
    }

    /// Switch by raw code, as found in markup, storage or arguments.
    pub fn switch_code(&mut self, browser: &mut Browser, code: Option<&str>) -> SwitchOutcome {
        match Language::from_optional_code(code) {
            Some(language) => self.switch_to(browser, language),
            None => {
                warn!("Invalid language code: {:?}", code);
                SwitchOutcome::Rejected
            }
        }
    }

    /// Switch to `language`, keeping state, markup, storage and URL in step.
    pub fn switch_to(&mut self, browser: &mut Browser, language: Language) -> SwitchOutcome {
        if language == self.active {
            debug!("Language '{}' already active", language);
            return SwitchOutcome::Unchanged;
        }

        self.active = language;
        set_document_lang(browser.document.as_mut(), language);

        if let Err(e) = browser.store.set(&self.keys.storage_key, language.code()) {
            warn!("Could not save language preference: {}", e);
        }

        let report = self.render(browser, Phase::Full);
        debug!("Switch sync report: {:?}", report);

        let location = browser.history.location();
        let value = (!language.is_default()).then(|| language.code());
        let updated = with_query_param(location, &self.keys.query_param, value);
        if &updated != location {
            browser.history.replace_state(updated);
        }

        info!("Language switched to '{}'", language);
        SwitchOutcome::Switched(language)
    }
}

fn set_document_lang(document: &mut dyn Document, language: Language) {
    if let Err(e) = document.set_lang(language.code()) {
        warn!("Could not set document language: {}", e);
    }
}

/// Mark the button of the active language and slide the toggles.
fn update_indicators(document: &mut dyn Document, language: Language) {
    let buttons = document.select_all(LANG_BUTTON_SELECTOR).unwrap_or_default();
    for button in buttons {
        let matches = document.attribute(button, "data-lang").as_deref() == Some(language.code());
        if let Err(e) = document.set_class(button, ACTIVE_CLASS, matches) {
            warn!("Could not update language button: {}", e);
        }
    }

    // The toggle carries the alternate language's code as a class while that
    // language is shown.
    let alternate_class = Language::DEFAULT.alternate().code();
    let switches = document.select_all(LANG_SWITCH_SELECTOR).unwrap_or_default();
    for switch in switches {
        if let Err(e) = document.set_class(switch, alternate_class, !language.is_default()) {
            warn!("Could not update language switch: {}", e);
        }
    }
}
