use super::geometry::{Point, Rect};

/// Roles worth hinting. Weak roles are only hinted when they expose an action.
pub mod role {
    pub const BUTTON: &str = "AXButton";
    pub const LINK: &str = "AXLink";
    pub const TEXT_FIELD: &str = "AXTextField";
    pub const TEXT_AREA: &str = "AXTextArea";
    pub const CHECK_BOX: &str = "AXCheckBox";
    pub const RADIO_BUTTON: &str = "AXRadioButton";
    pub const TAB_BUTTON: &str = "AXTabButton";
    pub const MENU_ITEM: &str = "AXMenuItem";
    pub const MENU_BUTTON: &str = "AXMenuButton";
    pub const POP_UP_BUTTON: &str = "AXPopUpButton";
    pub const COMBO_BOX: &str = "AXComboBox";

    pub const GROUP: &str = "AXGroup";
    pub const IMAGE: &str = "AXImage";
    pub const STATIC_TEXT: &str = "AXStaticText";
    pub const ROW: &str = "AXRow";

    pub const TRUSTED: &[&str] = &[
        BUTTON,
        LINK,
        TEXT_FIELD,
        TEXT_AREA,
        CHECK_BOX,
        RADIO_BUTTON,
        TAB_BUTTON,
        MENU_ITEM,
        MENU_BUTTON,
        POP_UP_BUTTON,
        COMBO_BOX,
    ];

    pub const WEAK: &[&str] = &[GROUP, IMAGE, STATIC_TEXT, ROW];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleClass {
    Trusted,
    Weak,
}

impl RoleClass {
    pub fn of(role: &str) -> Option<Self> {
        if role::TRUSTED.contains(&role) {
            Some(RoleClass::Trusted)
        } else if role::WEAK.contains(&role) {
            Some(RoleClass::Weak)
        } else {
            None
        }
    }
}

/// A discovered hint target.
///
/// `bounds` is captured once at discovery and never refreshed; `node` is a
/// reference into a tree this process does not own and may go stale at any
/// time.
#[derive(Debug, Clone)]
pub struct UIElement<N> {
    pub label: String,
    pub role: String,
    pub bounds: Rect,
    pub node: N,
}

impl<N> UIElement<N> {
    pub fn new(role: impl Into<String>, bounds: Rect, node: N) -> Self {
        Self {
            label: String::new(),
            role: role.into(),
            bounds,
            node,
        }
    }

    pub fn is_weak(&self) -> bool {
        RoleClass::of(&self.role) == Some(RoleClass::Weak)
    }

    pub fn center(&self) -> Point {
        self.bounds.center()
    }
}

/// Labelled elements of one scan, nearest to the screen center first.
#[derive(Debug, Clone)]
pub struct ScanResult<N> {
    elements: Vec<UIElement<N>>,
}

impl<N> Default for ScanResult<N> {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
        }
    }
}

impl<N> ScanResult<N> {
    pub fn new(elements: Vec<UIElement<N>>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[UIElement<N>] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> Option<&UIElement<N>> {
        self.elements.get(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|e| e.label.as_str())
    }
}

/// Order candidates by distance from `center`, nearest first. Stable, so
/// equidistant elements keep traversal order.
pub fn sort_by_distance<N>(elements: &mut [UIElement<N>], center: Point) {
    elements.sort_by(|a, b| {
        a.center()
            .distance_to(center)
            .total_cmp(&b.center().distance_to(center))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_roles() {
        assert_eq!(RoleClass::of("AXButton"), Some(RoleClass::Trusted));
        assert_eq!(RoleClass::of("AXStaticText"), Some(RoleClass::Weak));
        assert_eq!(RoleClass::of("AXRow"), Some(RoleClass::Weak));
        assert_eq!(RoleClass::of("AXScrollArea"), None);
        assert_eq!(RoleClass::of("AXWindow"), None);
    }

    #[test]
    fn sorts_nearest_to_center_first() {
        let mut elements = vec![
            UIElement::new(role::BUTTON, Rect::new(0.0, 0.0, 10.0, 10.0), 0),
            UIElement::new(role::BUTTON, Rect::new(495.0, 495.0, 10.0, 10.0), 1),
            UIElement::new(role::BUTTON, Rect::new(300.0, 300.0, 10.0, 10.0), 2),
        ];
        sort_by_distance(&mut elements, Point::new(500.0, 500.0));
        let order: Vec<_> = elements.iter().map(|e| e.node).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn new_elements_start_unlabelled() {
        let e = UIElement::new(role::LINK, Rect::new(0.0, 0.0, 10.0, 10.0), ());
        assert!(e.label.is_empty());
        assert!(!e.is_weak());
    }
}
