//! Page events delivered to the session.

use crate::dom::NodeId;
use crate::gesture::PointerKind;
use anyhow::{Context, Result};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    KeyDown,
    PointerDown,
    PointerUp,
    PointerCancel,
    Submit,
    Load,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Click {
        target: NodeId,
    },
    KeyDown {
        key: String,
    },
    /// Touch start or mouse down
    PointerDown {
        target: NodeId,
        x: f64,
        kind: PointerKind,
    },
    /// Touch end or mouse up
    PointerUp {
        target: NodeId,
        x: f64,
        kind: PointerKind,
    },
    PointerCancel {
        target: NodeId,
        kind: PointerKind,
    },
    /// Form submission with the form's field values
    Submit {
        target: NodeId,
        fields: BTreeMap<String, String>,
    },
    /// Every resource of the page has finished loading
    Load,
}

impl PageEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PageEvent::Click { .. } => EventKind::Click,
            PageEvent::KeyDown { .. } => EventKind::KeyDown,
            PageEvent::PointerDown { .. } => EventKind::PointerDown,
            PageEvent::PointerUp { .. } => EventKind::PointerUp,
            PageEvent::PointerCancel { .. } => EventKind::PointerCancel,
            PageEvent::Submit { .. } => EventKind::Submit,
            PageEvent::Load => EventKind::Load,
        }
    }

    /// The element the event originated on, for element events.
    pub fn target(&self) -> Option<NodeId> {
        match self {
            PageEvent::Click { target }
            | PageEvent::PointerDown { target, .. }
            | PageEvent::PointerUp { target, .. }
            | PageEvent::PointerCancel { target, .. }
            | PageEvent::Submit { target, .. } => Some(*target),
            PageEvent::KeyDown { .. } | PageEvent::Load => None,
        }
    }

    /// Horizontal position of a pointer event.
    pub fn x(&self) -> Option<f64> {
        match self {
            PageEvent::PointerDown { x, .. } | PageEvent::PointerUp { x, .. } => Some(*x),
            _ => None,
        }
    }

    pub fn click(target: NodeId) -> Self {
        PageEvent::Click { target }
    }

    pub fn key(key: &str) -> Self {
        PageEvent::KeyDown {
            key: key.to_string(),
        }
    }
}

/// An event as seen by one handler.
#[derive(Debug, Clone, Copy)]
pub struct EventContext<'a> {
    pub event: &'a PageEvent,
    /// The element the handler was registered on (target or an ancestor)
    pub current_target: Option<NodeId>,
}

impl EventContext<'_> {
    pub fn target(&self) -> Option<NodeId> {
        self.event.target()
    }

    /// The element the handler is attached to.
    pub fn element(&self) -> Result<NodeId> {
        self.current_target
            .context("handler was registered without a selector")
    }

    /// Horizontal position, for pointer events.
    pub fn x(&self) -> Result<f64> {
        self.event
            .x()
            .with_context(|| format!("{:?} event has no position", self.event.kind()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_target() {
        let click = PageEvent::click(NodeId(3));
        assert_eq!(click.kind(), EventKind::Click);
        assert_eq!(click.target(), Some(NodeId(3)));

        let key = PageEvent::key("Escape");
        assert_eq!(key.kind(), EventKind::KeyDown);
        assert_eq!(key.target(), None);
    }

    #[test]
    fn test_pointer_position() {
        let down = PageEvent::PointerDown {
            target: NodeId(1),
            x: 12.5,
            kind: PointerKind::Touch,
        };
        assert_eq!(down.x(), Some(12.5));
        assert_eq!(PageEvent::Load.x(), None);
    }

    #[test]
    fn test_context_accessors() {
        let event = PageEvent::Load;
        let ctx = EventContext {
            event: &event,
            current_target: None,
        };
        assert!(ctx.element().is_err());
        assert!(ctx.x().is_err());
    }
}
