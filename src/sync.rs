//! Content synchronization: rewrite every translatable region for a language.
//!
//! Each pass re-queries the document for every region. A region whose nodes
//! are absent, or a catalog entry that is missing, degrades to "leave the
//! text as it is"; nothing here fails.

use crate::dom::{Document, NodeId, Selector};
use crate::i18n::{sections, Catalog, Language};
use tracing::{debug, warn};

/// Attribute holding a node's default-language text.
pub const ORIGINAL_TEXT_ATTR: &str = "data-original";

/// Attribute holding a node's stable translation key.
pub const STABLE_KEY_ATTR: &str = "data-museum-id";

/// Which regions a pass covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Only regions present in the page's own markup
    Core,
    /// Every region, including those inside the injected navigation bar
    Full,
}

/// How a region's nodes are matched to catalog content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Node `i` in document order gets string `i` of an ordered section.
    /// With `all_or_nothing`, the region is only touched when it has at least
    /// as many nodes as the section has strings.
    Positional { all_or_nothing: bool },
    /// Keyed section, looked up by the current page slug.
    PageKeyed,
    /// Keyed section, looked up by a fixed key.
    FixedKey(&'static str),
    /// Keyed section, looked up by the node's marker attributes; the default
    /// language restores the node's own original text.
    Marked,
}

/// A translatable region of the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub selector: &'static str,
    pub section: &'static str,
    pub kind: RegionKind,
    pub needs_navbar: bool,
}

/// Regions of the portfolio site.
pub const SITE_REGIONS: &[Region] = &[
    Region {
        name: "navigation",
        selector: ".nav-link",
        section: sections::NAVIGATION,
        kind: RegionKind::Positional {
            all_or_nothing: false,
        },
        needs_navbar: true,
    },
    Region {
        name: "biography",
        selector: "#biografia-home .biography-content p",
        section: sections::BIOGRAPHY,
        kind: RegionKind::Positional {
            all_or_nothing: true,
        },
        needs_navbar: false,
    },
    Region {
        name: "page title",
        selector: ".page-title",
        section: sections::TITLES,
        kind: RegionKind::PageKeyed,
        needs_navbar: false,
    },
    Region {
        name: "footer",
        selector: ".footer-country",
        section: sections::FOOTER,
        kind: RegionKind::FixedKey("country"),
        needs_navbar: false,
    },
    Region {
        name: "exhibition tabs",
        selector: ".exhibition-tab",
        section: sections::EXHIBITIONS,
        kind: RegionKind::Positional {
            all_or_nothing: false,
        },
        needs_navbar: false,
    },
    Region {
        name: "museum locations",
        selector: ".museum-location",
        section: sections::MUSEUM_LOCATIONS,
        kind: RegionKind::Marked,
        needs_navbar: false,
    },
];

/// Outcome of one synchronization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Nodes whose text was rewritten
    pub updated: usize,
    /// Nodes that already showed the right text
    pub unchanged: usize,
    /// Nodes left alone for lack of a translation
    pub skipped: usize,
    /// Regions with no nodes in the document
    pub missing_regions: Vec<&'static str>,
}

impl SyncReport {
    fn record(&mut self, outcome: NodeOutcome) {
        match outcome {
            NodeOutcome::Updated => self.updated += 1,
            NodeOutcome::Unchanged => self.unchanged += 1,
            NodeOutcome::Skipped => self.skipped += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeOutcome {
    Updated,
    Unchanged,
    Skipped,
}

/// Applies catalog content to the page.
#[derive(Debug, Clone)]
pub struct ContentSynchronizer {
    regions: Vec<Region>,
}

impl Default for ContentSynchronizer {
    fn default() -> Self {
        Self::new(SITE_REGIONS.to_vec())
    }
}

impl ContentSynchronizer {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// Rewrite every region covered by `phase` to show `language`.
    ///
    /// Does not touch the active language state; that belongs to the caller.
    pub fn apply_language(
        &self,
        document: &mut dyn Document,
        catalog: &Catalog,
        language: Language,
        page_slug: &str,
        phase: Phase,
    ) -> SyncReport {
        let mut report = SyncReport::default();

        for region in &self.regions {
            if phase == Phase::Core && region.needs_navbar {
                continue;
            }

            let selector = match Selector::parse(region.selector) {
                Ok(selector) => selector,
                Err(e) => {
                    warn!("Region '{}' has an invalid selector: {}", region.name, e);
                    continue;
                }
            };
            let nodes = document.query_all(&selector);
            if nodes.is_empty() {
                debug!("Region '{}' not present on this page", region.name);
                report.missing_regions.push(region.name);
                continue;
            }

            match region.kind {
                RegionKind::Positional { all_or_nothing } => self.apply_positional(
                    document,
                    catalog,
                    language,
                    region,
                    &nodes,
                    all_or_nothing,
                    &mut report,
                ),
                RegionKind::PageKeyed => {
                    let text = catalog.keyed(language, region.section, page_slug);
                    if text.is_none() {
                        debug!("No '{}' entry for page '{}' in '{}'", region.section, page_slug, language);
                    }
                    for &node in &nodes {
                        report.record(write_text(document, node, text));
                    }
                }
                RegionKind::FixedKey(key) => {
                    let text = catalog.keyed(language, region.section, key);
                    for &node in &nodes {
                        report.record(write_text(document, node, text));
                    }
                }
                RegionKind::Marked => {
                    for &node in &nodes {
                        let text = marked_text(document, catalog, language, region.section, node);
                        report.record(write_text(document, node, text.as_deref()));
                    }
                }
            }
        }

        debug!(
            "Applied '{}' ({:?}): {} updated, {} unchanged, {} skipped",
            language, phase, report.updated, report.unchanged, report.skipped
        );
        report
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_positional(
        &self,
        document: &mut dyn Document,
        catalog: &Catalog,
        language: Language,
        region: &Region,
        nodes: &[NodeId],
        all_or_nothing: bool,
        report: &mut SyncReport,
    ) {
        let Some(items) = catalog.ordered(language, region.section) else {
            debug!("No '{}' section for '{}'", region.section, language);
            report.skipped += nodes.len();
            return;
        };

        if all_or_nothing && nodes.len() < items.len() {
            debug!(
                "Region '{}' has {} nodes, needs {}; leaving it alone",
                region.name,
                nodes.len(),
                items.len()
            );
            report.skipped += nodes.len();
            return;
        }

        // Excess nodes keep their text; excess strings are ignored.
        for (index, &node) in nodes.iter().enumerate() {
            let text = items.get(index).map(String::as_str);
            report.record(write_text(document, node, text));
        }
    }
}

/// Text a marker-keyed node should show in `language`.
fn marked_text(
    document: &dyn Document,
    catalog: &Catalog,
    language: Language,
    section: &str,
    node: NodeId,
) -> Option<String> {
    let original = document.attribute(node, ORIGINAL_TEXT_ATTR);
    if language.is_default() {
        return original;
    }

    let key = document
        .attribute(node, STABLE_KEY_ATTR)
        .or_else(|| original.clone())?;
    catalog.keyed(language, section, &key).map(str::to_string)
}

fn write_text(document: &mut dyn Document, node: NodeId, text: Option<&str>) -> NodeOutcome {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return NodeOutcome::Skipped;
    };
    if document.text(node).as_deref() == Some(text) {
        return NodeOutcome::Unchanged;
    }
    match document.set_text(node, text) {
        Ok(()) => NodeOutcome::Updated,
        Err(e) => {
            warn!("Could not update node {}: {}", node, e);
            NodeOutcome::Skipped
        }
    }
}
