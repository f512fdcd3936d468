//! Mobile navigation drawer and in-site links.

use crate::browser::{with_query_param, Browser};
use crate::dom::{Document, NodeId};
use crate::i18n::Language;
use anyhow::{Context, Result};
use tracing::{debug, info};
use url::Url;

pub const NAV_TOGGLE_SELECTOR: &str = ".nav-toggle";
pub const NAV_MENU_SELECTOR: &str = ".nav-menu";
pub const NAV_LINK_SELECTOR: &str = ".nav-link";
pub const NAV_BRAND_SELECTOR: &str = ".nav-brand";

pub const OPEN_CLASS: &str = "active";
pub const CLICKED_CLASS: &str = "clicked";

/// Page the brand link leads to.
pub const HOME_PAGE: &str = "index.html";

fn drawer_parts(document: &dyn Document) -> Result<Option<(NodeId, NodeId)>> {
    let toggle = document.select(NAV_TOGGLE_SELECTOR)?;
    let menu = document.select(NAV_MENU_SELECTOR)?;
    Ok(toggle.zip(menu))
}

pub fn is_menu_open(document: &dyn Document) -> bool {
    document
        .select(NAV_MENU_SELECTOR)
        .ok()
        .flatten()
        .is_some_and(|menu| document.has_class(menu, OPEN_CLASS))
}

/// Open or close the drawer. Returns whether it is now open.
pub fn toggle_menu(document: &mut dyn Document) -> Result<bool> {
    let Some((toggle, menu)) = drawer_parts(document)? else {
        debug!("Navigation drawer not present");
        return Ok(false);
    };

    let open = !document.has_class(menu, OPEN_CLASS);
    document.set_class(toggle, OPEN_CLASS, open)?;
    document.set_class(menu, OPEN_CLASS, open)?;
    document.set_scroll_locked(open)?;
    debug!("Navigation drawer {}", if open { "opened" } else { "closed" });
    Ok(open)
}

pub fn close_menu(document: &mut dyn Document) -> Result<()> {
    let Some((toggle, menu)) = drawer_parts(document)? else {
        return Ok(());
    };
    document.remove_class(toggle, OPEN_CLASS)?;
    document.remove_class(menu, OPEN_CLASS)?;
    document.set_scroll_locked(false)?;
    Ok(())
}

/// Follow a navigation link: mark it, close the drawer, then navigate.
pub fn follow_link(browser: &mut Browser, link: NodeId) -> Result<()> {
    let href = browser
        .document
        .attribute(link, "href")
        .with_context(|| format!("navigation link {} has no href", link))?;
    let target = browser
        .history
        .location()
        .join(&href)
        .with_context(|| format!("Invalid link target: {}", href))?;

    browser.document.add_class(link, CLICKED_CLASS)?;
    close_menu(browser.document.as_mut())?;

    info!("Navigating to {}", target);
    browser.history.navigate(target);
    Ok(())
}

/// The home page URL, carrying the language only when it is not the default.
pub fn home_url(location: &Url, language: Language, query_param: &str) -> Result<Url> {
    let home = location
        .join(HOME_PAGE)
        .with_context(|| format!("Cannot resolve home page from {}", location))?;
    let value = (!language.is_default()).then(|| language.code());
    Ok(with_query_param(&home, query_param, value))
}

pub fn go_home(browser: &mut Browser, language: Language, query_param: &str) -> Result<()> {
    let target = home_url(browser.history.location(), language, query_param)?;
    info!("Navigating home: {}", target);
    browser.history.navigate(target);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{MemoryHistory, MemoryStore};
    use crate::dom::{ElementSpec, MemoryDocument};

    fn page() -> MemoryDocument {
        MemoryDocument::from_spec(
            &ElementSpec::new("html").with_child(
                ElementSpec::new("body")
                    .with_child(ElementSpec::new("button").with_class("nav-toggle"))
                    .with_child(
                        ElementSpec::new("ul").with_class("nav-menu").with_child(
                            ElementSpec::new("a")
                                .with_class("nav-link")
                                .with_attr("href", "opere.html")
                                .with_text("Opere"),
                        ),
                    ),
            ),
        )
    }

    fn browser(url: &str) -> Browser {
        Browser::new(page(), MemoryStore::new(), MemoryHistory::parse(url).unwrap())
    }

    // ==================== Drawer Tests ====================

    #[test]
    fn test_toggle_locks_scroll_while_open() {
        let mut doc = page();

        assert!(toggle_menu(&mut doc).unwrap());
        assert!(is_menu_open(&doc));
        assert!(doc.scroll_locked());
        let toggle = doc.select(".nav-toggle").unwrap().unwrap();
        assert!(doc.has_class(toggle, "active"));

        assert!(!toggle_menu(&mut doc).unwrap());
        assert!(!is_menu_open(&doc));
        assert!(!doc.scroll_locked());
    }

    #[test]
    fn test_toggle_without_drawer_is_noop() {
        let mut doc = MemoryDocument::from_spec(&ElementSpec::new("html").with_child(ElementSpec::new("body")));
        assert!(!toggle_menu(&mut doc).unwrap());
        assert!(close_menu(&mut doc).is_ok());
    }

    // ==================== Link Tests ====================

    #[test]
    fn test_follow_link_closes_and_navigates() {
        let mut browser = browser("https://site.test/gallery/index.html?lang=en");
        toggle_menu(browser.document.as_mut()).unwrap();
        let link = browser.document.select(".nav-link").unwrap().unwrap();

        follow_link(&mut browser, link).unwrap();

        assert!(browser.document.has_class(link, "clicked"));
        assert!(!is_menu_open(browser.document.as_ref()));
        assert!(!browser.document.scroll_locked());
        assert_eq!(browser.history.location().as_str(), "https://site.test/gallery/opere.html");
    }

    #[test]
    fn test_follow_link_without_href_fails() {
        let mut browser = browser("https://site.test/");
        let toggle = browser.document.select(".nav-toggle").unwrap().unwrap();
        assert!(follow_link(&mut browser, toggle).is_err());
    }

    #[test]
    fn test_home_url_carries_language_only_when_not_default() {
        let location = Url::parse("https://site.test/opere.html?lang=en&x=1").unwrap();

        let english = home_url(&location, Language::English, "lang").unwrap();
        assert_eq!(english.as_str(), "https://site.test/index.html?lang=en");

        let italian = home_url(&location, Language::Italian, "lang").unwrap();
        assert_eq!(italian.as_str(), "https://site.test/index.html");
    }

    #[test]
    fn test_go_home_navigates() {
        let mut browser = browser("https://site.test/biografia.html");
        go_home(&mut browser, Language::English, "lang").unwrap();
        assert_eq!(browser.history.location().as_str(), "https://site.test/index.html?lang=en");
    }
}
