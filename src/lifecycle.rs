//! Page lifecycle: two initialization phases and event routing.
//!
//! Phase one runs on the page's own markup. Phase two runs once the shared
//! navigation bar has been injected. Every handler is a plain function
//! known at construction time; the phases only decide when a table of them
//! starts receiving events.

use crate::admin::{self, AdminError, AdminPanel, MoveDirection};
use crate::boundary::guard;
use crate::browser::Browser;
use crate::config::Config;
use crate::dom::Selector;
use crate::events::{EventContext, EventKind, PageEvent};
use crate::gesture::DragGesture;
use crate::i18n::{Catalog, Language};
use crate::lightbox;
use crate::navigation;
use crate::switcher::{LanguageController, SwitchOutcome, LANG_BUTTON_SELECTOR};
use crate::sync::{ContentSynchronizer, Phase, SyncReport};
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Elements whose absence is worth a warning at startup.
pub const CRITICAL_SELECTORS: &[&str] = &[
    navigation::NAV_TOGGLE_SELECTOR,
    navigation::NAV_MENU_SELECTOR,
    lightbox::LIGHTBOX_SELECTOR,
];

pub const MOBILE_SWITCH_SELECTOR: &str = ".language-switch-mobile";
pub const DRAGGING_CLASS: &str = "dragging";
pub const LOADED_CLASS: &str = "loaded";

/// Everything a handler may touch.
pub struct PageContext {
    pub browser: Browser,
    pub controller: LanguageController,
    pub drag: DragGesture,
    pub admin: AdminPanel,
}

pub type Handler = fn(&mut PageContext, &EventContext<'_>) -> Result<()>;

/// A handler row: name (for logs), event kind, optional element selector.
type HandlerSpec = (&'static str, EventKind, Option<&'static str>, Handler);

const CORE_HANDLERS: &[HandlerSpec] = &[
    ("gallery-open", EventKind::Click, Some(lightbox::GALLERY_ITEM_SELECTOR), open_lightbox),
    ("lightbox-close", EventKind::Click, Some(lightbox::LIGHTBOX_CLOSE_SELECTOR), close_lightbox),
    ("lightbox-backdrop", EventKind::Click, Some(lightbox::LIGHTBOX_SELECTOR), lightbox_backdrop),
    ("keydown", EventKind::KeyDown, None, keydown),
    ("page-loaded", EventKind::Load, None, mark_loaded),
];

const NAVBAR_HANDLERS: &[HandlerSpec] = &[
    ("language-button", EventKind::Click, Some(LANG_BUTTON_SELECTOR), language_button),
    ("nav-toggle", EventKind::Click, Some(navigation::NAV_TOGGLE_SELECTOR), toggle_menu),
    ("nav-link", EventKind::Click, Some(navigation::NAV_LINK_SELECTOR), follow_link),
    ("nav-brand", EventKind::Click, Some(navigation::NAV_BRAND_SELECTOR), go_home),
    ("drag-start", EventKind::PointerDown, Some(MOBILE_SWITCH_SELECTOR), drag_start),
    ("drag-end", EventKind::PointerUp, Some(MOBILE_SWITCH_SELECTOR), drag_end),
    ("drag-cancel", EventKind::PointerCancel, Some(MOBILE_SWITCH_SELECTOR), drag_cancel),
    ("admin-toggle", EventKind::Click, Some(admin::ADMIN_TOGGLE_SELECTOR), admin_toggle),
    ("admin-login", EventKind::Submit, Some(admin::ADMIN_LOGIN_SELECTOR), admin_login),
    ("admin-logout", EventKind::Click, Some(admin::ADMIN_LOGOUT_SELECTOR), admin_logout),
    ("museum-add", EventKind::Click, Some(admin::MUSEUM_ADD_SELECTOR), museum_add),
    ("museum-delete", EventKind::Click, Some(admin::MUSEUM_DELETE_SELECTOR), museum_delete),
    ("museum-up", EventKind::Click, Some(admin::MUSEUM_UP_SELECTOR), museum_up),
    ("museum-down", EventKind::Click, Some(admin::MUSEUM_DOWN_SELECTOR), museum_down),
];

struct Registration {
    name: &'static str,
    kind: EventKind,
    selector: Option<Selector>,
    handler: Handler,
}

pub struct PageSession {
    context: PageContext,
    registrations: Vec<Registration>,
    core_ready: bool,
    navbar_ready: bool,
}

impl PageSession {
    pub fn new(config: &Config, browser: Browser, catalog: Catalog) -> Self {
        let controller = LanguageController::new(
            catalog,
            ContentSynchronizer::default(),
            config.language_keys(),
        );
        Self {
            context: PageContext {
                browser,
                controller,
                drag: DragGesture::new(config.drag_threshold_px),
                admin: AdminPanel::from_config(config),
            },
            registrations: Vec::new(),
            core_ready: false,
            navbar_ready: false,
        }
    }

    /// Phase one: resolve the language and translate the page's own content.
    pub fn init_core(&mut self) -> SyncReport {
        if self.core_ready {
            debug!("Core already initialized");
            return SyncReport::default();
        }

        for css in CRITICAL_SELECTORS {
            let present = self.context.browser.document.select(css).ok().flatten().is_some();
            if !present {
                warn!("Critical element '{}' not found", css);
            }
        }

        let context = &mut self.context;
        context.controller.initialize(&mut context.browser);
        let report = context.controller.render(&mut context.browser, Phase::Core);

        self.register(CORE_HANDLERS);
        self.core_ready = true;
        info!("Core initialized in '{}'", self.context.controller.active());
        report
    }

    /// Phase two: the navigation bar is in place, bind and translate it.
    ///
    /// Runs phase one first if nobody has yet.
    pub fn init_navbar(&mut self) -> SyncReport {
        if !self.core_ready {
            self.init_core();
        }
        if self.navbar_ready {
            debug!("Navigation bar already initialized");
            return SyncReport::default();
        }

        self.register(NAVBAR_HANDLERS);

        let context = &mut self.context;
        if let Err(e) = context.admin.restore(&mut context.browser) {
            warn!("Could not restore edit mode: {}", e);
        }
        let report = context.controller.render(&mut context.browser, Phase::Full);

        self.navbar_ready = true;
        info!("Navigation bar initialized");
        report
    }

    fn register(&mut self, specs: &[HandlerSpec]) {
        for &(name, kind, css, handler) in specs {
            let selector = match css.map(Selector::parse).transpose() {
                Ok(selector) => selector,
                Err(e) => {
                    warn!("Skipping handler '{}': {}", name, e);
                    continue;
                }
            };
            self.registrations.push(Registration {
                name,
                kind,
                selector,
                handler,
            });
        }
    }

    /// Deliver `event` to every matching handler. Returns how many ran.
    ///
    /// A handler with a selector runs when the event target or one of its
    /// ancestors matches; that element becomes its `current_target`.
    pub fn dispatch(&mut self, event: &PageEvent) -> usize {
        let mut invoked = 0;
        for registration in &self.registrations {
            if registration.kind != event.kind() {
                continue;
            }

            let current_target = match &registration.selector {
                None => None,
                Some(selector) => {
                    let Some(target) = event.target() else {
                        continue;
                    };
                    match self.context.browser.document.closest(target, selector) {
                        Some(node) => Some(node),
                        None => continue,
                    }
                }
            };

            let ctx = EventContext {
                event,
                current_target,
            };
            let context = &mut self.context;
            guard(registration.name, || (registration.handler)(context, &ctx));
            invoked += 1;
        }
        invoked
    }

    /// Switch language from outside the page (command line, tests).
    pub fn switch_language(&mut self, code: &str) -> SwitchOutcome {
        let context = &mut self.context;
        context.controller.switch_code(&mut context.browser, Some(code))
    }

    pub fn active_language(&self) -> Language {
        self.context.controller.active()
    }

    pub fn is_core_ready(&self) -> bool {
        self.core_ready
    }

    pub fn is_navbar_ready(&self) -> bool {
        self.navbar_ready
    }

    pub fn handler_count(&self) -> usize {
        self.registrations.len()
    }

    pub fn context(&self) -> &PageContext {
        &self.context
    }

    pub fn browser(&self) -> &Browser {
        &self.context.browser
    }

    pub fn browser_mut(&mut self) -> &mut Browser {
        &mut self.context.browser
    }

    pub fn into_browser(self) -> Browser {
        self.context.browser
    }
}

// ==================== Core Handlers ====================

fn open_lightbox(page: &mut PageContext, event: &EventContext<'_>) -> Result<()> {
    lightbox::open(&mut page.browser, event.element()?)?;
    Ok(())
}

fn close_lightbox(page: &mut PageContext, _event: &EventContext<'_>) -> Result<()> {
    lightbox::close(page.browser.document.as_mut())
}

fn lightbox_backdrop(page: &mut PageContext, event: &EventContext<'_>) -> Result<()> {
    let target = event.target().context("click without a target")?;
    lightbox::close_on_backdrop(page.browser.document.as_mut(), target)?;
    Ok(())
}

fn keydown(page: &mut PageContext, event: &EventContext<'_>) -> Result<()> {
    if let PageEvent::KeyDown { key } = event.event {
        lightbox::close_on_key(page.browser.document.as_mut(), key)?;
    }
    Ok(())
}

fn mark_loaded(page: &mut PageContext, _event: &EventContext<'_>) -> Result<()> {
    let document = page.browser.document.as_mut();
    let body = document.body().context("page has no body")?;
    document.add_class(body, LOADED_CLASS)?;
    Ok(())
}

// ==================== Navigation Bar Handlers ====================

fn language_button(page: &mut PageContext, event: &EventContext<'_>) -> Result<()> {
    let button = event.element()?;
    let code = page.browser.document.attribute(button, "data-lang");
    page.controller.switch_code(&mut page.browser, code.as_deref());
    Ok(())
}

fn toggle_menu(page: &mut PageContext, _event: &EventContext<'_>) -> Result<()> {
    navigation::toggle_menu(page.browser.document.as_mut())?;
    Ok(())
}

fn follow_link(page: &mut PageContext, event: &EventContext<'_>) -> Result<()> {
    navigation::follow_link(&mut page.browser, event.element()?)
}

fn go_home(page: &mut PageContext, _event: &EventContext<'_>) -> Result<()> {
    let language = page.controller.active();
    let query_param = page.controller.keys().query_param.clone();
    navigation::go_home(&mut page.browser, language, &query_param)
}

fn drag_start(page: &mut PageContext, event: &EventContext<'_>) -> Result<()> {
    let switch = event.element()?;
    page.drag.start(event.x()?);
    page.browser.document.add_class(switch, DRAGGING_CLASS)?;
    Ok(())
}

fn drag_end(page: &mut PageContext, event: &EventContext<'_>) -> Result<()> {
    let switch = event.element()?;
    page.browser.document.remove_class(switch, DRAGGING_CLASS)?;

    // Read the live state at release; the page may have switched since the press.
    let current = page.controller.active();
    if let Some(language) = page.drag.finish(event.x()?, current) {
        debug!("Drag requests '{}'", language);
        page.controller.switch_to(&mut page.browser, language);
    }
    Ok(())
}

fn drag_cancel(page: &mut PageContext, event: &EventContext<'_>) -> Result<()> {
    page.drag.cancel();
    page.browser
        .document
        .remove_class(event.element()?, DRAGGING_CLASS)?;
    Ok(())
}

fn admin_toggle(page: &mut PageContext, _event: &EventContext<'_>) -> Result<()> {
    admin::toggle_panel(page.browser.document.as_mut())?;
    Ok(())
}

fn admin_login(page: &mut PageContext, event: &EventContext<'_>) -> Result<()> {
    let PageEvent::Submit { fields, .. } = event.event else {
        return Ok(());
    };
    let username = fields
        .get("username")
        .ok_or(AdminError::MissingField("username"))?;
    let password = fields
        .get("password")
        .ok_or(AdminError::MissingField("password"))?;

    match page.admin.login(&mut page.browser, username, password) {
        // Already logged as a warning; a typo is not a handler failure.
        Err(AdminError::InvalidCredentials) => Ok(()),
        other => other.context("Admin login failed"),
    }
}

fn admin_logout(page: &mut PageContext, _event: &EventContext<'_>) -> Result<()> {
    page.admin.logout(&mut page.browser)?;
    Ok(())
}

fn museum_add(page: &mut PageContext, _event: &EventContext<'_>) -> Result<()> {
    match admin::add_museum(page.browser.document.as_mut()) {
        Ok(Some(_)) => {
            // The new location must show the active language straight away.
            page.controller.render(&mut page.browser, Phase::Full);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(AdminError::EmptyName) => {
            warn!("Museum name is empty");
            Ok(())
        }
        Err(e) => Err(e).context("Failed to add museum"),
    }
}

fn museum_delete(page: &mut PageContext, event: &EventContext<'_>) -> Result<()> {
    admin::delete_museum(page.browser.document.as_mut(), event.element()?)?;
    Ok(())
}

fn museum_up(page: &mut PageContext, event: &EventContext<'_>) -> Result<()> {
    admin::move_museum(page.browser.document.as_mut(), event.element()?, MoveDirection::Up)?;
    Ok(())
}

fn museum_down(page: &mut PageContext, event: &EventContext<'_>) -> Result<()> {
    admin::move_museum(page.browser.document.as_mut(), event.element()?, MoveDirection::Down)?;
    Ok(())
}
