//! Gallery lightbox.
//!
//! Opening copies the clicked image into the overlay and rebuilds the
//! caption from the item's overlay text. Captions are assigned as plain
//! text; nothing from the gallery markup is ever parsed.

use crate::browser::Browser;
use crate::dom::{Document, NodeId, Selector};
use anyhow::{Context, Result};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};
use url::Url;

pub const GALLERY_ITEM_SELECTOR: &str = ".gallery-item";
pub const GALLERY_OVERLAY_SELECTOR: &str = ".gallery-overlay";
pub const LIGHTBOX_SELECTOR: &str = "#lightbox";
pub const LIGHTBOX_IMAGE_SELECTOR: &str = "#lightbox-img";
pub const LIGHTBOX_CAPTION_SELECTOR: &str = ".lightbox-caption";
pub const LIGHTBOX_CLOSE_SELECTOR: &str = ".lightbox-close";

pub const OPEN_CLASS: &str = "active";

static IMAGE_EXTENSION_REGEX: OnceLock<Regex> = OnceLock::new();

/// Whether `url` may be shown in the lightbox.
///
/// Accepts http(s) URLs that mention an image extension anywhere, or any
/// image served from Unsplash (whose URLs carry no extension).
pub fn is_valid_image_url(url: &Url) -> bool {
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    let regex = IMAGE_EXTENSION_REGEX.get_or_init(|| Regex::new(r"(?i)\.(jpe?g|png|gif|webp|svg)").unwrap());
    if regex.is_match(url.as_str()) {
        return true;
    }
    url.host_str()
        .is_some_and(|host| host == "unsplash.com" || host.ends_with(".unsplash.com"))
}

/// Resolve an `img` `src` attribute the way the browser would.
pub fn resolve_image_source(location: &Url, src: &str) -> Option<Url> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }
    location.join(src).ok()
}

pub fn is_open(document: &dyn Document) -> bool {
    document
        .select(LIGHTBOX_SELECTOR)
        .ok()
        .flatten()
        .is_some_and(|lightbox| document.has_class(lightbox, OPEN_CLASS))
}

/// Text of the first `css` match inside `scope`, or empty.
fn text_within(document: &dyn Document, scope: NodeId, css: &str) -> Result<String> {
    let selector = Selector::parse(css)?;
    Ok(document
        .query_within(scope, &selector)
        .first()
        .and_then(|&node| document.text(node))
        .unwrap_or_default())
}

/// Show the image of gallery item `item`. Returns whether the lightbox opened.
pub fn open(browser: &mut Browser, item: NodeId) -> Result<bool> {
    let document = browser.document.as_mut();

    let image = document
        .query_within(item, &Selector::parse("img")?)
        .first()
        .copied();
    let overlay = document
        .query_within(item, &Selector::parse(GALLERY_OVERLAY_SELECTOR)?)
        .first()
        .copied();
    let lightbox = document.select(LIGHTBOX_SELECTOR)?;
    let lightbox_image = document.select(LIGHTBOX_IMAGE_SELECTOR)?;
    let caption = document.select(LIGHTBOX_CAPTION_SELECTOR)?;

    let (Some(image), Some(overlay), Some(lightbox), Some(lightbox_image), Some(caption)) =
        (image, overlay, lightbox, lightbox_image, caption)
    else {
        debug!("Gallery item {} or lightbox is incomplete", item);
        return Ok(false);
    };

    let src = document.attribute(image, "src").unwrap_or_default();
    let Some(source) = resolve_image_source(browser.history.location(), &src)
        .filter(is_valid_image_url)
    else {
        warn!("Invalid image source: {:?}", src);
        return Ok(false);
    };

    let alt = document.attribute(image, "alt").unwrap_or_default();
    let title = text_within(document, overlay, "h3")?;
    let description = text_within(document, overlay, "p")?;

    document.set_attribute(lightbox_image, "src", source.as_str())?;
    document.set_attribute(lightbox_image, "alt", &alt)?;

    document.set_text(caption, "")?;
    let heading = document
        .create_element(caption, "h3")
        .context("Failed to build caption title")?;
    document.set_text(heading, &title)?;
    let paragraph = document
        .create_element(caption, "p")
        .context("Failed to build caption description")?;
    document.set_text(paragraph, &description)?;

    document.add_class(lightbox, OPEN_CLASS)?;
    document.set_scroll_locked(true)?;
    debug!("Lightbox opened for {}", source);
    Ok(true)
}

pub fn close(document: &mut dyn Document) -> Result<()> {
    if let Some(lightbox) = document.select(LIGHTBOX_SELECTOR)? {
        document.remove_class(lightbox, OPEN_CLASS)?;
        document.set_scroll_locked(false)?;
    }
    Ok(())
}

/// A click inside the lightbox closes it only when it hit the backdrop.
pub fn close_on_backdrop(document: &mut dyn Document, target: NodeId) -> Result<bool> {
    if document.select(LIGHTBOX_SELECTOR)? != Some(target) {
        return Ok(false);
    }
    close(document)?;
    Ok(true)
}

/// `Escape` closes an open lightbox.
pub fn close_on_key(document: &mut dyn Document, key: &str) -> Result<bool> {
    if key != "Escape" || !is_open(document) {
        return Ok(false);
    }
    close(document)?;
    Ok(true)
}
