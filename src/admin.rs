//! Edit overlay for the museum list.
//!
//! The credentials are a demo pair shipped with the page. Anyone can read
//! them, so this gates a convenience UI and is not access control. All
//! museum edits live in the document only; the login flag is the single
//! thing persisted.

use crate::browser::Browser;
use crate::config::Config;
use crate::dom::{Document, DomError, ElementSpec, NodeId, Selector, SelectorError};
use crate::sync::ORIGINAL_TEXT_ATTR;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const ADMIN_TOGGLE_SELECTOR: &str = ".admin-toggle";
pub const ADMIN_PANEL_SELECTOR: &str = ".admin-panel";
pub const ADMIN_LOGIN_SELECTOR: &str = "#admin-login";
pub const ADMIN_LOGOUT_SELECTOR: &str = ".admin-logout";

pub const MUSEUM_LIST_SELECTOR: &str = ".museum-list";
pub const MUSEUM_ITEM_SELECTOR: &str = ".museum-item";
pub const MUSEUM_NAME_INPUT_SELECTOR: &str = "#museum-new-name";
pub const MUSEUM_ADD_SELECTOR: &str = ".museum-add";
pub const MUSEUM_DELETE_SELECTOR: &str = ".museum-delete";
pub const MUSEUM_UP_SELECTOR: &str = ".museum-up";
pub const MUSEUM_DOWN_SELECTOR: &str = ".museum-down";

pub const EDIT_MODE_CLASS: &str = "edit-mode";
pub const PANEL_OPEN_CLASS: &str = "active";

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("login form is missing the '{0}' field")]
    MissingField(&'static str),

    #[error("page has no element matching '{0}'")]
    MissingElement(&'static str),

    #[error("museum name is empty")]
    EmptyName,

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Selector(#[from] SelectorError),
}

pub fn is_editing(document: &dyn Document) -> bool {
    document
        .body()
        .is_some_and(|body| document.has_class(body, EDIT_MODE_CLASS))
}

fn body(document: &dyn Document) -> Result<NodeId, AdminError> {
    document.body().ok_or(AdminError::MissingElement("body"))
}

#[derive(Debug, Clone)]
pub struct AdminPanel {
    username: String,
    password: String,
    flag_key: String,
}

impl AdminPanel {
    pub fn new(username: &str, password: &str, flag_key: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            flag_key: flag_key.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.admin_username, &config.admin_password, &config.admin_flag_key)
    }

    fn credentials_match(&self, username: &str, password: &str) -> bool {
        // Both fields are always compared, so a wrong username takes as long
        // as a wrong password.
        let user_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        (user_ok & pass_ok).into()
    }

    pub fn login(&self, browser: &mut Browser, username: &str, password: &str) -> Result<(), AdminError> {
        if !self.credentials_match(username, password) {
            warn!("Admin login rejected");
            return Err(AdminError::InvalidCredentials);
        }

        let document = browser.document.as_mut();
        let body = body(document)?;
        document.add_class(body, EDIT_MODE_CLASS)?;
        if let Some(panel) = document.select(ADMIN_PANEL_SELECTOR)? {
            document.remove_class(panel, PANEL_OPEN_CLASS)?;
        }

        if let Err(e) = browser.store.set(&self.flag_key, "true") {
            warn!("Could not save admin flag, edit mode lasts for this page only: {}", e);
        }
        info!("Edit mode enabled");
        Ok(())
    }

    pub fn logout(&self, browser: &mut Browser) -> Result<(), AdminError> {
        let document = browser.document.as_mut();
        let body = body(document)?;
        document.remove_class(body, EDIT_MODE_CLASS)?;

        if let Err(e) = browser.store.remove(&self.flag_key) {
            warn!("Could not clear admin flag: {}", e);
        }
        info!("Edit mode disabled");
        Ok(())
    }

    /// Re-enter edit mode if an earlier login left the flag set.
    pub fn restore(&self, browser: &mut Browser) -> Result<bool, AdminError> {
        let flagged = match browser.store.get(&self.flag_key) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!("Could not read admin flag: {}", e);
                false
            }
        };
        if flagged {
            let document = browser.document.as_mut();
            let body = body(document)?;
            document.add_class(body, EDIT_MODE_CLASS)?;
            debug!("Edit mode restored from storage");
        }
        Ok(flagged)
    }
}

/// Show or hide the login panel. Returns whether it is now shown.
pub fn toggle_panel(document: &mut dyn Document) -> Result<bool, AdminError> {
    let panel = document
        .select(ADMIN_PANEL_SELECTOR)?
        .ok_or(AdminError::MissingElement(ADMIN_PANEL_SELECTOR))?;
    Ok(document.toggle_class(panel, PANEL_OPEN_CLASS)?)
}

fn require_edit_mode(document: &dyn Document, action: &str) -> bool {
    let editing = is_editing(document);
    if !editing {
        warn!("Ignoring '{}' outside edit mode", action);
    }
    editing
}

fn museum_item_spec(name: &str) -> ElementSpec {
    ElementSpec::new("li")
        .with_class("museum-item")
        .with_child(
            ElementSpec::new("span")
                .with_class("museum-location")
                .with_attr(ORIGINAL_TEXT_ATTR, name)
                .with_text(name),
        )
        .with_child(ElementSpec::new("button").with_class("museum-up").with_text("↑"))
        .with_child(ElementSpec::new("button").with_class("museum-down").with_text("↓"))
        .with_child(ElementSpec::new("button").with_class("museum-delete").with_text("×"))
}

/// Append a museum named by the new-name input. Returns the new item.
pub fn add_museum(document: &mut dyn Document) -> Result<Option<NodeId>, AdminError> {
    if !require_edit_mode(document, "add museum") {
        return Ok(None);
    }

    let input = document
        .select(MUSEUM_NAME_INPUT_SELECTOR)?
        .ok_or(AdminError::MissingElement(MUSEUM_NAME_INPUT_SELECTOR))?;
    let list = document
        .select(MUSEUM_LIST_SELECTOR)?
        .ok_or(AdminError::MissingElement(MUSEUM_LIST_SELECTOR))?;

    let name = document.attribute(input, "value").unwrap_or_default();
    let name = name.trim();
    if name.is_empty() {
        return Err(AdminError::EmptyName);
    }

    let item = document.append_fragment(list, &museum_item_spec(name))?;
    document.set_attribute(input, "value", "")?;
    info!("Added museum '{}'", name);
    Ok(Some(item))
}

/// Remove the museum item containing `control`.
pub fn delete_museum(document: &mut dyn Document, control: NodeId) -> Result<bool, AdminError> {
    if !require_edit_mode(document, "delete museum") {
        return Ok(false);
    }
    let Some(item) = document.closest(control, &Selector::parse(MUSEUM_ITEM_SELECTOR)?) else {
        return Ok(false);
    };
    document.remove_node(item)?;
    debug!("Removed museum item {}", item);
    Ok(true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Swap the museum item containing `control` with its neighbour.
/// Returns false at either end of the list.
pub fn move_museum(
    document: &mut dyn Document,
    control: NodeId,
    direction: MoveDirection,
) -> Result<bool, AdminError> {
    if !require_edit_mode(document, "move museum") {
        return Ok(false);
    }
    let selector = Selector::parse(MUSEUM_ITEM_SELECTOR)?;
    let Some(item) = document.closest(control, &selector) else {
        return Ok(false);
    };
    let parent = document.parent(item).ok_or(DomError::NoParent(item))?;
    let siblings: Vec<NodeId> = document
        .children(parent)
        .into_iter()
        .filter(|&node| document.matches(node, &selector))
        .collect();
    let Some(index) = siblings.iter().position(|&node| node == item) else {
        return Ok(false);
    };

    match direction {
        MoveDirection::Up if index > 0 => document.insert_before(item, siblings[index - 1])?,
        MoveDirection::Down if index + 1 < siblings.len() => {
            document.insert_before(siblings[index + 1], item)?
        }
        _ => return Ok(false),
    }
    Ok(true)
}
