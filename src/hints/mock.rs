//! In-memory accessibility tree used by the pipeline tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use super::accessor::{attr, Accessibility, AxValue, Pid};
use super::geometry::{Point, Rect, Size};
use super::orchestrator::Desktop;
use super::overlay::LabelPlacement;
use super::timer::{TimerKind, TimerToken};
use crate::error::HintError;

pub type NodeId = usize;

#[derive(Debug, Default)]
struct MockNode {
    role: Option<String>,
    frame: Option<Rect>,
    children: Vec<NodeId>,
    visible_children: Option<Vec<NodeId>>,
    actions: Vec<String>,
    pid: Pid,
    minimized: Option<bool>,
    windows: Option<Vec<NodeId>>,
    focused_window: Option<NodeId>,
    press_error: Option<i32>,
    stale: bool,
}

#[derive(Debug, Default)]
pub struct MockTree {
    nodes: Vec<MockNode>,
    apps: HashMap<Pid, NodeId>,
    /// Hit-test layers, last entry on top.
    layers: Vec<(Rect, NodeId)>,
    role_queries: RefCell<Vec<NodeId>>,
    presses: RefCell<Vec<NodeId>>,
}

impl MockTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: MockNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn add_root(&mut self, role: &str, frame: Rect) -> NodeId {
        self.push(MockNode {
            role: Some(role.to_string()),
            frame: Some(frame),
            pid: 100,
            ..MockNode::default()
        })
    }

    pub fn add_child(&mut self, parent: NodeId, role: &str, frame: Rect) -> NodeId {
        let pid = self.nodes[parent].pid;
        let id = self.push(MockNode {
            role: Some(role.to_string()),
            frame: Some(frame),
            pid,
            ..MockNode::default()
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn add_app(&mut self, pid: Pid, windows: Vec<NodeId>) -> NodeId {
        for window in &windows {
            self.nodes[*window].pid = pid;
        }
        let id = self.push(MockNode {
            role: Some("AXApplication".to_string()),
            pid,
            windows: Some(windows),
            ..MockNode::default()
        });
        self.apps.insert(pid, id);
        id
    }

    pub fn add_window(&mut self, app: NodeId, frame: Rect) -> NodeId {
        let pid = self.nodes[app].pid;
        let id = self.push(MockNode {
            role: Some("AXWindow".to_string()),
            frame: Some(frame),
            pid,
            minimized: Some(false),
            ..MockNode::default()
        });
        self.nodes[app].windows.get_or_insert_with(Vec::new).push(id);
        id
    }

    pub fn set_visible_children(&mut self, node: NodeId, children: Vec<NodeId>) {
        self.nodes[node].visible_children = Some(children);
    }

    pub fn set_focused_window(&mut self, app: NodeId, window: NodeId) {
        self.nodes[app].focused_window = Some(window);
    }

    pub fn set_actions(&mut self, node: NodeId, actions: &[&str]) {
        self.nodes[node].actions = actions.iter().map(|a| a.to_string()).collect();
    }

    pub fn set_minimized(&mut self, node: NodeId, minimized: bool) {
        self.nodes[node].minimized = Some(minimized);
    }

    pub fn clear_role(&mut self, node: NodeId) {
        self.nodes[node].role = None;
    }

    pub fn set_pid(&mut self, node: NodeId, pid: Pid) {
        self.nodes[node].pid = pid;
    }

    pub fn fail_press(&mut self, node: NodeId, code: i32) {
        self.nodes[node].press_error = Some(code);
    }

    /// Simulate the owning process destroying the node.
    pub fn make_stale(&mut self, node: NodeId) {
        self.nodes[node].stale = true;
    }

    /// Put `node` on top of the hit-test stack over `area`.
    pub fn cover(&mut self, area: Rect, node: NodeId) {
        self.layers.push((area, node));
    }

    /// Nodes whose role was queried, in visit order.
    pub fn visited(&self) -> Vec<NodeId> {
        self.role_queries.borrow().clone()
    }

    pub fn presses(&self) -> Vec<NodeId> {
        self.presses.borrow().clone()
    }

    pub fn windows_of(&self, pid: Pid) -> Vec<NodeId> {
        self.apps
            .get(&pid)
            .and_then(|app| self.nodes[*app].windows.clone())
            .unwrap_or_default()
    }

    pub fn depth_of(&self, target: NodeId) -> Option<usize> {
        fn walk(tree: &MockTree, node: NodeId, target: NodeId, depth: usize) -> Option<usize> {
            if node == target {
                return Some(depth);
            }
            tree.nodes[node]
                .children
                .iter()
                .find_map(|child| walk(tree, *child, target, depth + 1))
        }
        (0..self.nodes.len())
            .filter(|id| self.nodes[*id].role.as_deref() == Some("AXWindow"))
            .find_map(|root| walk(self, root, target, 0))
    }
}

impl Accessibility for MockTree {
    type Node = NodeId;

    fn attribute(&self, node: &NodeId, name: &str) -> Option<AxValue<NodeId>> {
        let n = self.nodes.get(*node)?;
        if n.stale {
            return None;
        }
        match name {
            attr::ROLE => {
                self.role_queries.borrow_mut().push(*node);
                n.role.clone().map(AxValue::String)
            }
            attr::POSITION => n.frame.map(|f| AxValue::Point(Point::new(f.x, f.y))),
            attr::SIZE => n.frame.map(|f| AxValue::Size(Size::new(f.width, f.height))),
            attr::MINIMIZED => n.minimized.map(AxValue::Bool),
            attr::CHILDREN => Some(AxValue::Elements(n.children.clone())),
            attr::VISIBLE_CHILDREN => n.visible_children.clone().map(AxValue::Elements),
            attr::WINDOWS => n.windows.clone().map(AxValue::Elements),
            attr::FOCUSED_WINDOW => n.focused_window.map(AxValue::Element),
            _ => None,
        }
    }

    fn actions(&self, node: &NodeId) -> Vec<String> {
        self.nodes
            .get(*node)
            .filter(|n| !n.stale)
            .map(|n| n.actions.clone())
            .unwrap_or_default()
    }

    fn element_at(&self, point: Point) -> Option<NodeId> {
        self.layers
            .iter()
            .rev()
            .find(|(area, _)| area.contains(point))
            .map(|(_, node)| *node)
    }

    fn owner_pid(&self, node: &NodeId) -> Option<Pid> {
        self.nodes.get(*node).filter(|n| !n.stale).map(|n| n.pid)
    }

    fn application(&self, pid: Pid) -> Option<NodeId> {
        self.apps.get(&pid).copied()
    }

    fn perform_action(&self, node: &NodeId, action: &str) -> Result<(), HintError> {
        let n = self.nodes.get(*node).ok_or(HintError::StaleElement)?;
        if n.stale {
            return Err(HintError::StaleElement);
        }
        if let Some(code) = n.press_error {
            return Err(HintError::ActionFailed {
                action: action.to_string(),
                code,
            });
        }
        self.presses.borrow_mut().push(*node);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DesktopEvent {
    Beep,
    Show(Vec<String>),
    Narrow(String),
    Hide,
    Activate(Pid),
    Click(Point),
    Schedule(TimerToken, Duration),
}

/// Records every side effect the orchestrator asks for.
pub struct MockDesktop {
    pub tree: MockTree,
    pub trusted: bool,
    pub frontmost: Option<Pid>,
    pub screen: Rect,
    pub fail_click: bool,
    events: RefCell<Vec<DesktopEvent>>,
}

impl MockDesktop {
    pub fn new(frontmost: Pid, screen: Rect) -> Self {
        Self {
            tree: MockTree::new(),
            trusted: true,
            frontmost: Some(frontmost),
            screen,
            fail_click: false,
            events: RefCell::new(Vec::new()),
        }
    }

    fn record(&self, event: DesktopEvent) {
        self.events.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<DesktopEvent> {
        self.events.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&DesktopEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }

    pub fn last_shown(&self) -> Option<Vec<String>> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            DesktopEvent::Show(labels) => Some(labels.clone()),
            _ => None,
        })
    }

    /// Most recently scheduled token of `kind`.
    pub fn scheduled(&self, kind: TimerKind) -> Option<TimerToken> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            DesktopEvent::Schedule(token, _) if token.kind == kind => Some(*token),
            _ => None,
        })
    }

    pub fn delay_of(&self, token: TimerToken) -> Option<Duration> {
        self.events.borrow().iter().find_map(|e| match e {
            DesktopEvent::Schedule(t, delay) if *t == token => Some(*delay),
            _ => None,
        })
    }
}

impl Desktop for MockDesktop {
    type Ax = MockTree;

    fn accessibility(&self) -> &MockTree {
        &self.tree
    }

    fn is_trusted(&self) -> bool {
        self.trusted
    }

    fn frontmost_pid(&self) -> Option<Pid> {
        self.frontmost
    }

    fn screen_frame(&self) -> Rect {
        self.screen
    }

    fn activate_process(&self, pid: Pid) -> Result<(), HintError> {
        self.record(DesktopEvent::Activate(pid));
        Ok(())
    }

    fn post_click(&self, point: Point) -> Result<(), HintError> {
        if self.fail_click {
            return Err(HintError::SyntheticClick("event source unavailable".into()));
        }
        self.record(DesktopEvent::Click(point));
        Ok(())
    }

    fn beep(&self) {
        self.record(DesktopEvent::Beep);
    }

    fn show_overlay(&self, labels: &[LabelPlacement]) {
        self.record(DesktopEvent::Show(
            labels.iter().map(|l| l.label.clone()).collect(),
        ));
    }

    fn narrow_overlay(&self, typed: &str) {
        self.record(DesktopEvent::Narrow(typed.to_string()));
    }

    fn hide_overlay(&self) {
        self.record(DesktopEvent::Hide);
    }

    fn schedule(&self, token: TimerToken, delay: Duration) {
        self.record(DesktopEvent::Schedule(token, delay));
    }
}
