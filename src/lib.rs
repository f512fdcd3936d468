//! Bilingual content layer for the Giorgio Vigna portfolio site.
//!
//! Pages ship in Italian. This crate resolves the visitor's language from
//! the URL or a stored preference, rewrites the language-dependent regions
//! of a page, and keeps URL, storage and the document `lang` attribute in
//! step on every switch. The page itself is reached only through the
//! [`dom::Document`] and [`browser`] seams.

pub mod admin;
pub mod boundary;
pub mod browser;
pub mod config;
pub mod dom;
pub mod events;
pub mod gesture;
pub mod i18n;
pub mod lifecycle;
pub mod lightbox;
pub mod navigation;
pub mod resolver;
pub mod switcher;
pub mod sync;
