//! Geometry-pruned walk over the windows of one application.
//!
//! The walk keeps a running visible rect (ancestor visible rect intersected
//! with the node's own frame) and abandons a branch as soon as that rect
//! becomes too small. Depth and fan-out are capped because foreign trees
//! (web engines, virtualized lists) can be arbitrarily deep or wide.

use super::accessor::{attr, frame_of, Accessibility, AxValue};
use super::element::{RoleClass, UIElement};
use super::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanLimits {
    pub min_window_side: f64,
    pub min_visible_side: f64,
    pub max_depth: usize,
    pub max_element_side: f64,
    /// Nodes with more children than this only have their ends scanned.
    pub fanout_threshold: usize,
    pub fanout_keep_each_end: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            min_window_side: 10.0,
            min_visible_side: 5.0,
            max_depth: 50,
            max_element_side: 2000.0,
            fanout_threshold: 400,
            fanout_keep_each_end: 150,
        }
    }
}

/// A top-level window with the attributes read once before the walk.
#[derive(Debug, Clone)]
pub struct ScanWindow<N> {
    pub node: N,
    pub minimized: bool,
    pub frame: Rect,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub windows: usize,
    pub visited: usize,
    pub max_depth: usize,
    pub candidates: usize,
    pub truncated_nodes: usize,
}

const NODE_ATTRIBUTES: &[&str] = &[attr::ROLE, attr::POSITION, attr::SIZE];
const WINDOW_ATTRIBUTES: &[&str] = &[attr::MINIMIZED, attr::POSITION, attr::SIZE];

pub struct Scanner<'a, A: Accessibility> {
    ax: &'a A,
    limits: ScanLimits,
    stats: ScanStats,
}

struct Pending<N> {
    node: N,
    visible: Rect,
    depth: usize,
}

impl<'a, A: Accessibility> Scanner<'a, A> {
    pub fn new(ax: &'a A) -> Self {
        Self::with_limits(ax, ScanLimits::default())
    }

    pub fn with_limits(ax: &'a A, limits: ScanLimits) -> Self {
        Self {
            ax,
            limits,
            stats: ScanStats::default(),
        }
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Read minimized state and frame for each window.
    pub fn describe_windows(&self, windows: Vec<A::Node>) -> Vec<ScanWindow<A::Node>> {
        windows
            .into_iter()
            .map(|node| {
                let attrs = self.ax.attributes(&node, WINDOW_ATTRIBUTES);
                let minimized = attrs
                    .get(attr::MINIMIZED)
                    .and_then(AxValue::as_bool)
                    .unwrap_or(false);
                let frame = frame_of(&attrs);
                ScanWindow {
                    node,
                    minimized,
                    frame,
                }
            })
            .collect()
    }

    pub fn scan(&mut self, windows: &[ScanWindow<A::Node>]) -> Vec<UIElement<A::Node>> {
        self.stats = ScanStats::default();
        let mut found = Vec::new();

        for window in windows {
            if window.minimized {
                continue;
            }
            if window.frame.width < self.limits.min_window_side
                || window.frame.height < self.limits.min_window_side
            {
                continue;
            }
            self.stats.windows += 1;
            self.walk(window.node.clone(), window.frame, &mut found);
        }

        self.stats.candidates = found.len();
        found
    }

    fn walk(&mut self, root: A::Node, window_frame: Rect, found: &mut Vec<UIElement<A::Node>>) {
        let mut stack = vec![Pending {
            node: root,
            visible: window_frame,
            depth: 0,
        }];

        while let Some(Pending {
            node,
            visible,
            depth,
        }) = stack.pop()
        {
            self.stats.visited += 1;
            self.stats.max_depth = self.stats.max_depth.max(depth);

            let attrs = self.ax.attributes(&node, NODE_ATTRIBUTES);
            let Some(role) = attrs.get(attr::ROLE).and_then(AxValue::as_str) else {
                continue;
            };
            let frame = frame_of(&attrs);

            let Some(visible) = visible.intersection(&frame) else {
                continue;
            };
            if visible.width < self.limits.min_visible_side
                || visible.height < self.limits.min_visible_side
            {
                continue;
            }

            if self.is_target(&node, role, &frame) {
                found.push(UIElement::new(role, frame, node.clone()));
            }

            if depth >= self.limits.max_depth {
                continue;
            }

            let children = self.trim_fanout(self.ax.children(&node), depth);
            // Reversed so the stack pops children in tree order.
            stack.extend(children.into_iter().rev().map(|child| Pending {
                node: child,
                visible,
                depth: depth + 1,
            }));
        }
    }

    fn is_target(&self, node: &A::Node, role: &str, frame: &Rect) -> bool {
        let confirmed = match RoleClass::of(role) {
            Some(RoleClass::Trusted) => true,
            Some(RoleClass::Weak) => !self.ax.actions(node).is_empty(),
            None => false,
        };
        confirmed
            && frame.width < self.limits.max_element_side
            && frame.height < self.limits.max_element_side
    }

    fn trim_fanout(&mut self, mut children: Vec<A::Node>, depth: usize) -> Vec<A::Node> {
        let count = children.len();
        if count <= self.limits.fanout_threshold {
            return children;
        }
        let keep = self.limits.fanout_keep_each_end;
        if count <= keep * 2 {
            return children;
        }
        tracing::debug!(depth, count, kept = keep * 2, "wide node, scanning head and tail only");
        self.stats.truncated_nodes += 1;
        let tail = children.split_off(count - keep);
        children.truncate(keep);
        children.extend(tail);
        children
    }
}
