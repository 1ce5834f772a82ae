use super::accessor::{Accessibility, Pid};
use super::element::UIElement;

/// Drop candidates whose center is covered by another process's surface.
///
/// The topmost node at each candidate's center is hit-tested system-wide.
/// A hit owned by `target_pid` keeps the candidate; a hit owned by any other
/// process removes it. When no owner can be determined the candidate is
/// kept. Hits owned by `own_pid` (this process, i.e. the overlay) never
/// count as covering.
pub fn filter_occluded<A: Accessibility>(
    ax: &A,
    candidates: Vec<UIElement<A::Node>>,
    target_pid: Pid,
    own_pid: Option<Pid>,
) -> Vec<UIElement<A::Node>> {
    candidates
        .into_iter()
        .filter(|candidate| {
            let center = candidate.center();
            let owner = ax
                .element_at(center)
                .and_then(|hit| ax.owner_pid(&hit));
            match owner {
                Some(pid) if pid == target_pid => true,
                Some(pid) if Some(pid) == own_pid => true,
                Some(pid) => {
                    tracing::trace!(role = %candidate.role, x = center.x, y = center.y, pid, "covered by another process");
                    false
                }
                None => true,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::mock::MockTree;
    use super::*;
    use crate::hints::geometry::Rect;

    #[test]
    fn keeps_elements_whose_center_hits_the_target() {
        let mut tree = MockTree::new();
        let app = tree.add_app(7, vec![]);
        let window = tree.add_window(app, Rect::new(0.0, 0.0, 800.0, 600.0));
        tree.cover(Rect::new(0.0, 0.0, 800.0, 600.0), window);

        let candidates = vec![UIElement::new("AXButton", Rect::new(10.0, 10.0, 40.0, 20.0), window)];
        let kept = filter_occluded(&tree, candidates, 7, None);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn drops_elements_under_a_foreign_window() {
        let mut tree = MockTree::new();
        let app = tree.add_app(7, vec![]);
        let window = tree.add_window(app, Rect::new(0.0, 0.0, 800.0, 600.0));
        let other_app = tree.add_app(9, vec![]);
        let popup = tree.add_window(other_app, Rect::new(0.0, 0.0, 200.0, 200.0));
        tree.cover(Rect::new(0.0, 0.0, 800.0, 600.0), window);
        tree.cover(Rect::new(0.0, 0.0, 200.0, 200.0), popup);

        let under = tree.add_child(window, "AXButton", Rect::new(10.0, 10.0, 40.0, 20.0));
        let clear = tree.add_child(window, "AXButton", Rect::new(300.0, 10.0, 40.0, 20.0));
        let candidates = vec![
            UIElement::new("AXButton", Rect::new(10.0, 10.0, 40.0, 20.0), under),
            UIElement::new("AXButton", Rect::new(300.0, 10.0, 40.0, 20.0), clear),
        ];

        let kept: Vec<_> = filter_occluded(&tree, candidates, 7, None)
            .into_iter()
            .map(|e| e.node)
            .collect();
        assert_eq!(kept, vec![clear]);
    }

    #[test]
    fn failed_hit_test_keeps_candidate() {
        let tree = MockTree::new();
        let candidates = vec![UIElement::new("AXButton", Rect::new(10.0, 10.0, 40.0, 20.0), 0)];
        assert_eq!(filter_occluded(&tree, candidates, 7, None).len(), 1);
    }

    #[test]
    fn own_overlay_does_not_occlude() {
        let mut tree = MockTree::new();
        let overlay = tree.add_root("AXWindow", Rect::new(0.0, 0.0, 800.0, 600.0));
        tree.set_pid(overlay, 55);
        tree.cover(Rect::new(0.0, 0.0, 800.0, 600.0), overlay);

        let candidates = vec![UIElement::new("AXButton", Rect::new(10.0, 10.0, 40.0, 20.0), 0)];
        assert_eq!(filter_occluded(&tree, candidates.clone(), 7, Some(55)).len(), 1);
        assert!(filter_occluded(&tree, candidates, 7, None).is_empty());
    }
}
