//! Arena-backed in-memory page, loadable from a JSON fixture.

use crate::dom::{Document, DomError, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serializable description of an element subtree.
///
/// ```json
/// { "tag": "a", "classes": ["nav-link"], "attributes": { "href": "opere.html" },
///   "text": "Opere" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Add one or more space-separated classes.
    pub fn with_class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = ElementSpec>) -> Self {
        self.children.extend(children);
        self
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    attached: bool,
}

/// In-memory document. Removed nodes keep their slot but are marked detached,
/// so a stale `NodeId` never aliases a newer element.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl MemoryDocument {
    /// Build a document whose root element is described by `spec`.
    pub fn from_spec(spec: &ElementSpec) -> Self {
        let mut document = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        document.root = document.build(spec, None);
        document
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let spec: ElementSpec = serde_json::from_str(json)?;
        Ok(Self::from_spec(&spec))
    }

    /// Insert a fragment as the last child of `parent`.
    pub fn inject(&mut self, parent: NodeId, spec: &ElementSpec) -> Result<NodeId, DomError> {
        self.live(parent)?;
        let node = self.build(spec, Some(parent));
        self.nodes[parent.0].children.push(node);
        Ok(node)
    }

    fn snapshot_node(&self, node: NodeId) -> ElementSpec {
        let data = &self.nodes[node.0];
        let mut attributes = data.attributes.clone();
        let id = attributes.remove("id");
        ElementSpec {
            tag: data.tag.clone(),
            id,
            classes: data.classes.clone(),
            attributes,
            text: data.text.clone(),
            children: data
                .children
                .iter()
                .map(|&child| self.snapshot_node(child))
                .collect(),
        }
    }

    fn build(&mut self, spec: &ElementSpec, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut attributes = spec.attributes.clone();
        if let Some(element_id) = &spec.id {
            attributes.insert("id".to_string(), element_id.clone());
        }
        self.nodes.push(NodeData {
            tag: spec.tag.to_ascii_lowercase(),
            attributes,
            classes: Vec::new(),
            text: spec.text.clone(),
            children: Vec::new(),
            parent,
            attached: true,
        });
        for class in &spec.classes {
            if !self.nodes[id.0].classes.contains(class) {
                self.nodes[id.0].classes.push(class.clone());
            }
        }

        let children: Vec<NodeId> = spec
            .children
            .iter()
            .map(|child| self.build(child, Some(id)))
            .collect();
        self.nodes[id.0].children = children;
        id
    }

    fn get(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.0).filter(|data| data.attached)
    }

    fn live(&self, node: NodeId) -> Result<(), DomError> {
        match self.get(node) {
            Some(_) => Ok(()),
            None => Err(DomError::StaleNode(node)),
        }
    }

    fn live_mut(&mut self, node: NodeId) -> Result<&mut NodeData, DomError> {
        self.nodes
            .get_mut(node.0)
            .filter(|data| data.attached)
            .ok_or(DomError::StaleNode(node))
    }

    fn detach_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let data = &mut self.nodes[current.0];
            data.attached = false;
            stack.extend(data.children.iter().copied());
        }
    }

    /// Unlink `node` from its current parent's child list.
    fn unlink(&mut self, node: NodeId) -> Result<(), DomError> {
        let parent = self
            .get(node)
            .ok_or(DomError::StaleNode(node))?
            .parent
            .ok_or(DomError::NoParent(node))?;
        self.nodes[parent.0].children.retain(|&child| child != node);
        self.nodes[node.0].parent = None;
        Ok(())
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == candidate {
                return true;
            }
            current = self.nodes[n.0].parent;
        }
        false
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let data = &self.nodes[node.0];
        out.push_str(&data.text);
        for &child in &data.children {
            self.collect_text(child, out);
        }
    }
}

impl Document for MemoryDocument {
    fn root(&self) -> NodeId {
        self.root
    }

    fn tag(&self, node: NodeId) -> Option<String> {
        self.get(node).map(|data| data.tag.clone())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|data| data.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.get(node)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let data = self.get(node)?;
        if name == "class" {
            return Some(data.classes.join(" "));
        }
        data.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let data = self.live_mut(node)?;
        if name == "class" {
            data.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            data.attributes.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), DomError> {
        let data = self.live_mut(node)?;
        if name == "class" {
            data.classes.clear();
        } else {
            data.attributes.remove(name);
        }
        Ok(())
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.get(node)
            .is_some_and(|data| data.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        let data = self.live_mut(node)?;
        if !data.classes.iter().any(|c| c == class) {
            data.classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        let data = self.live_mut(node)?;
        data.classes.retain(|c| c != class);
        Ok(())
    }

    fn text(&self, node: NodeId) -> Option<String> {
        self.get(node)?;
        let mut out = String::new();
        self.collect_text(node, &mut out);
        Some(out)
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), DomError> {
        let children = std::mem::take(&mut self.live_mut(node)?.children);
        for child in children {
            self.nodes[child.0].parent = None;
            self.detach_subtree(child);
        }
        self.nodes[node.0].text = text.to_string();
        Ok(())
    }

    fn create_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, DomError> {
        self.inject(parent, &ElementSpec::new(tag))
    }

    fn append_fragment(&mut self, parent: NodeId, spec: &ElementSpec) -> Result<NodeId, DomError> {
        self.inject(parent, spec)
    }

    fn snapshot(&self) -> ElementSpec {
        self.snapshot_node(self.root)
    }

    fn remove_node(&mut self, node: NodeId) -> Result<(), DomError> {
        self.unlink(node)?;
        self.detach_subtree(node);
        Ok(())
    }

    fn insert_before(&mut self, node: NodeId, reference: NodeId) -> Result<(), DomError> {
        if node == reference {
            return Ok(());
        }
        self.live(node)?;
        let parent = self
            .get(reference)
            .ok_or(DomError::StaleNode(reference))?
            .parent
            .ok_or(DomError::NoParent(reference))?;
        if self.is_ancestor_or_self(node, reference) {
            return Err(DomError::Cycle { node, reference });
        }

        self.unlink(node)?;
        let siblings = &mut self.nodes[parent.0].children;
        let index = siblings
            .iter()
            .position(|&child| child == reference)
            .unwrap_or(siblings.len());
        siblings.insert(index, node);
        self.nodes[node.0].parent = Some(parent);
        Ok(())
    }

    fn append_child(&mut self, parent: NodeId, node: NodeId) -> Result<(), DomError> {
        self.live(parent)?;
        self.live(node)?;
        if self.is_ancestor_or_self(node, parent) {
            return Err(DomError::Cycle {
                node,
                reference: parent,
            });
        }
        self.unlink(node)?;
        self.nodes[parent.0].children.push(node);
        self.nodes[node.0].parent = Some(parent);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Selector;

    fn page() -> MemoryDocument {
        MemoryDocument::from_spec(
            &ElementSpec::new("html").with_child(
                ElementSpec::new("body")
                    .with_child(
                        ElementSpec::new("section")
                            .with_id("biografia-home")
                            .with_child(
                                ElementSpec::new("div")
                                    .with_class("biography-content")
                                    .with_children([
                                        ElementSpec::new("p").with_text("uno"),
                                        ElementSpec::new("p").with_text("due"),
                                    ]),
                            ),
                    )
                    .with_child(ElementSpec::new("p").with_class("outside").with_text("tre")),
            ),
        )
    }

    fn sel(css: &str) -> Selector {
        Selector::parse(css).unwrap()
    }

    // ==================== Query Tests ====================

    #[test]
    fn test_query_all_document_order() {
        let doc = page();
        let paragraphs = doc.query_all(&sel("p"));
        let texts: Vec<_> = paragraphs.iter().map(|&p| doc.text(p).unwrap()).collect();
        assert_eq!(texts, vec!["uno", "due", "tre"]);
    }

    #[test]
    fn test_descendant_selector() {
        let doc = page();
        let paragraphs = doc.query_all(&sel("#biografia-home .biography-content p"));
        assert_eq!(paragraphs.len(), 2);
        assert!(doc.query_all(&sel(".biography-content .outside")).is_empty());
    }

    #[test]
    fn test_group_selector_keeps_document_order() {
        let doc = page();
        let found = doc.query_all(&sel(".outside, #biografia-home"));
        assert_eq!(found.len(), 2);
        assert_eq!(doc.tag(found[0]).as_deref(), Some("section"));
    }

    #[test]
    fn test_closest() {
        let doc = page();
        let p = doc.query(&sel(".biography-content p")).unwrap();
        let section = doc.closest(p, &sel("section")).unwrap();
        assert_eq!(doc.attribute(section, "id").as_deref(), Some("biografia-home"));
        assert!(doc.closest(p, &sel(".missing")).is_none());
    }

    #[test]
    fn test_body_and_root() {
        let doc = page();
        assert_eq!(doc.tag(doc.root()).as_deref(), Some("html"));
        assert_eq!(doc.tag(doc.body().unwrap()).as_deref(), Some("body"));
    }

    // ==================== Mutation Tests ====================

    #[test]
    fn test_set_text_replaces_children() {
        let mut doc = page();
        let content = doc.query(&sel(".biography-content")).unwrap();
        let old_children = doc.children(content);
        doc.set_text(content, "<b>plain</b>").unwrap();

        assert_eq!(doc.text(content).as_deref(), Some("<b>plain</b>"));
        assert!(doc.children(content).is_empty());
        assert!(doc.query_all(&sel("b")).is_empty());
        assert!(!doc.is_attached(old_children[0]));
    }

    #[test]
    fn test_classes() {
        let mut doc = page();
        let body = doc.body().unwrap();
        doc.add_class(body, "loaded").unwrap();
        doc.add_class(body, "loaded").unwrap();
        assert_eq!(doc.attribute(body, "class").as_deref(), Some("loaded"));
        assert!(!doc.toggle_class(body, "loaded").unwrap());
        assert!(doc.toggle_class(body, "loaded").unwrap());
    }

    #[test]
    fn test_remove_node_makes_id_stale() {
        let mut doc = page();
        let outside = doc.query(&sel(".outside")).unwrap();
        doc.remove_node(outside).unwrap();

        assert!(doc.query(&sel(".outside")).is_none());
        assert_eq!(doc.set_text(outside, "x"), Err(DomError::StaleNode(outside)));
        assert_eq!(doc.remove_node(outside), Err(DomError::StaleNode(outside)));
    }

    #[test]
    fn test_remove_root_fails() {
        let mut doc = page();
        let root = doc.root();
        assert_eq!(doc.remove_node(root), Err(DomError::NoParent(root)));
    }

    #[test]
    fn test_insert_before_reorders() {
        let mut doc = page();
        let paragraphs = doc.query_all(&sel(".biography-content p"));
        doc.insert_before(paragraphs[1], paragraphs[0]).unwrap();

        let texts: Vec<_> = doc
            .query_all(&sel(".biography-content p"))
            .iter()
            .map(|&p| doc.text(p).unwrap())
            .collect();
        assert_eq!(texts, vec!["due", "uno"]);
    }

    #[test]
    fn test_insert_before_rejects_cycle() {
        let mut doc = page();
        let section = doc.query(&sel("section")).unwrap();
        let p = doc.query(&sel("section p")).unwrap();
        assert!(matches!(
            doc.insert_before(section, p),
            Err(DomError::Cycle { .. })
        ));
    }

    #[test]
    fn test_append_child_moves_node() {
        let mut doc = page();
        let body = doc.body().unwrap();
        let first = doc.query(&sel(".biography-content p")).unwrap();
        doc.append_child(body, first).unwrap();

        assert_eq!(doc.parent(first), Some(body));
        assert_eq!(doc.query_all(&sel(".biography-content p")).len(), 1);
    }

    #[test]
    fn test_inject_fragment_is_queryable() {
        let mut doc = page();
        let body = doc.body().unwrap();
        assert!(doc.query(&sel(".nav-link")).is_none());

        doc.inject(
            body,
            &ElementSpec::new("nav")
                .with_child(ElementSpec::new("a").with_class("nav-link").with_text("Opere")),
        )
        .unwrap();

        assert_eq!(doc.query_all(&sel("nav .nav-link")).len(), 1);
    }

    #[test]
    fn test_scroll_lock() {
        let mut doc = page();
        assert!(!doc.scroll_locked());
        doc.set_scroll_locked(true).unwrap();
        assert!(doc.scroll_locked());
        doc.set_scroll_locked(false).unwrap();
        assert!(!doc.scroll_locked());
    }

    // ==================== Serde Tests ====================

    #[test]
    fn test_json_fixture_and_snapshot() {
        let json = r#"{
            "tag": "html",
            "attributes": { "lang": "it" },
            "children": [
                { "tag": "body", "children": [
                    { "tag": "h1", "classes": ["page-title"], "id": "title", "text": "Opere" }
                ]}
            ]
        }"#;

        let doc = MemoryDocument::from_json(json).expect("valid fixture");
        assert_eq!(doc.lang().as_deref(), Some("it"));
        let title = doc.select("#title.page-title").unwrap().unwrap();
        assert_eq!(doc.text(title).as_deref(), Some("Opere"));

        let snapshot = doc.snapshot();
        let body = &snapshot.children[0];
        assert_eq!(body.children[0].id.as_deref(), Some("title"));
        assert!(!body.children[0].attributes.contains_key("id"));
    }
}
