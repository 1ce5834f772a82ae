//! Query facade over an accessibility tree owned by another process.
//!
//! Every call is fallible on the foreign side (stale node, hidden window,
//! refused access). Implementations report those as "no value" instead of
//! errors; only `press` surfaces a failure, because the caller falls back
//! to a synthetic click.

use std::collections::HashMap;

use super::geometry::{Point, Rect, Size};
use crate::error::HintError;

pub type Pid = i32;

/// Attribute names used by the pipeline.
pub mod attr {
    pub const ROLE: &str = "AXRole";
    pub const POSITION: &str = "AXPosition";
    pub const SIZE: &str = "AXSize";
    pub const MINIMIZED: &str = "AXMinimized";
    pub const CHILDREN: &str = "AXChildren";
    pub const VISIBLE_CHILDREN: &str = "AXVisibleChildren";
    pub const WINDOWS: &str = "AXWindows";
    pub const FOCUSED_WINDOW: &str = "AXFocusedWindow";
}

pub const PRESS_ACTION: &str = "AXPress";

/// A decoded attribute value. Anything the pipeline has no use for is absent.
#[derive(Debug, Clone, PartialEq)]
pub enum AxValue<N> {
    String(String),
    Bool(bool),
    Point(Point),
    Size(Size),
    Element(N),
    Elements(Vec<N>),
}

impl<N> AxValue<N> {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AxValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AxValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            AxValue::Point(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<Size> {
        match self {
            AxValue::Size(s) => Some(*s),
            _ => None,
        }
    }

    pub fn into_elements(self) -> Option<Vec<N>> {
        match self {
            AxValue::Elements(v) => Some(v),
            AxValue::Element(e) => Some(vec![e]),
            _ => None,
        }
    }
}

pub type AttributeMap<'a, N> = HashMap<&'a str, AxValue<N>>;

/// Frame assembled from the position and size entries of an attribute map.
/// Missing either half gives an empty rect, which the scanner prunes.
pub fn frame_of<N>(attrs: &AttributeMap<'_, N>) -> Rect {
    let origin = attrs.get(attr::POSITION).and_then(AxValue::as_point);
    let size = attrs.get(attr::SIZE).and_then(AxValue::as_size);
    match (origin, size) {
        (Some(origin), Some(size)) => Rect::from_origin_size(origin, size),
        _ => Rect::default(),
    }
}

pub trait Accessibility {
    /// Non-owning reference into the foreign tree.
    type Node: Clone;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<AxValue<Self::Node>>;

    /// Fetch several attributes at once, omitting the unavailable ones.
    fn attributes<'a>(&self, node: &Self::Node, names: &[&'a str]) -> AttributeMap<'a, Self::Node> {
        names
            .iter()
            .filter_map(|name| self.attribute(node, name).map(|value| (*name, value)))
            .collect()
    }

    /// Children in tree order, preferring the visible subset when the target exposes it.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node> {
        self.attribute(node, attr::VISIBLE_CHILDREN)
            .and_then(AxValue::into_elements)
            .or_else(|| {
                self.attribute(node, attr::CHILDREN)
                    .and_then(AxValue::into_elements)
            })
            .unwrap_or_default()
    }

    fn actions(&self, node: &Self::Node) -> Vec<String>;

    /// Topmost node at a screen point, system-wide.
    fn element_at(&self, point: Point) -> Option<Self::Node>;

    fn owner_pid(&self, node: &Self::Node) -> Option<Pid>;

    /// Root node of a running application.
    fn application(&self, pid: Pid) -> Option<Self::Node>;

    /// All windows of an application, or just its focused window when the
    /// window list is unavailable.
    fn windows(&self, app: &Self::Node) -> Vec<Self::Node> {
        self.attribute(app, attr::WINDOWS)
            .and_then(AxValue::into_elements)
            .filter(|windows| !windows.is_empty())
            .or_else(|| {
                self.attribute(app, attr::FOCUSED_WINDOW)
                    .and_then(AxValue::into_elements)
            })
            .unwrap_or_default()
    }

    fn perform_action(&self, node: &Self::Node, action: &str) -> Result<(), HintError>;

    fn press(&self, node: &Self::Node) -> Result<(), HintError> {
        self.perform_action(node, PRESS_ACTION)
    }
}
