use super::element::UIElement;

/// Share of a weak element's own area that, once covered by an accepted
/// element, makes it redundant.
pub const WEAK_COVERAGE: f64 = 0.9;
/// Two boxes that each cover more than this share of the other are the same target.
pub const MUTUAL_OVERLAP: f64 = 0.8;

/// Collapse near-duplicate candidates, keeping the first one discovered.
///
/// Quadratic in the candidate count, which stays in the low hundreds after
/// the scanner's pruning.
pub fn deduplicate<N>(candidates: Vec<UIElement<N>>) -> Vec<UIElement<N>> {
    let mut accepted: Vec<UIElement<N>> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        if !is_redundant(&candidate, &accepted) {
            accepted.push(candidate);
        }
    }
    accepted
}

fn is_redundant<N>(candidate: &UIElement<N>, accepted: &[UIElement<N>]) -> bool {
    let area = candidate.bounds.area();
    if area <= 0.0 {
        return true;
    }
    let weak = candidate.is_weak();

    accepted.iter().any(|existing| {
        let overlap = existing.bounds.intersection_area(&candidate.bounds);
        if overlap <= 0.0 {
            return false;
        }
        let ratio_new = overlap / area;
        let ratio_existing = overlap / existing.bounds.area();

        (weak && ratio_new >= WEAK_COVERAGE)
            || (ratio_new > MUTUAL_OVERLAP && ratio_existing > MUTUAL_OVERLAP)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hints::element::role;
    use crate::hints::geometry::Rect;

    fn el(role: &str, bounds: Rect, id: usize) -> UIElement<usize> {
        UIElement::new(role, bounds, id)
    }

    fn ids(elements: &[UIElement<usize>]) -> Vec<usize> {
        elements.iter().map(|e| e.node).collect()
    }

    #[test]
    fn text_inside_button_collapses_into_button() {
        // Corner coordinates: the label spans (5,5)-(50,20) inside the button (0,0)-(50,20).
        // Read as (x, y, w, h) both overlap ratios are 0.675 and both would survive;
        // DESIGN.md ("Dedup example geometry") records this reading.
        let a = el(role::BUTTON, Rect::from_corners(0.0, 0.0, 50.0, 20.0), 0);
        let b = el(role::STATIC_TEXT, Rect::from_corners(5.0, 5.0, 50.0, 20.0), 1);

        let survivors = deduplicate(vec![a, b]);
        assert_eq!(ids(&survivors), vec![0]);
    }

    #[test]
    fn near_identical_boxes_collapse_regardless_of_role() {
        let group = el(role::BUTTON, Rect::new(100.0, 100.0, 200.0, 40.0), 0);
        let button = el(role::LINK, Rect::new(102.0, 101.0, 198.0, 39.0), 1);

        let survivors = deduplicate(vec![group, button]);
        assert_eq!(ids(&survivors), vec![0]);
    }

    #[test]
    fn small_trusted_control_inside_big_one_survives() {
        let toolbar_button = el(role::BUTTON, Rect::new(0.0, 0.0, 400.0, 40.0), 0);
        let nested = el(role::CHECK_BOX, Rect::new(10.0, 10.0, 20.0, 20.0), 1);

        let survivors = deduplicate(vec![toolbar_button, nested]);
        assert_eq!(ids(&survivors), vec![0, 1]);
    }

    #[test]
    fn weak_element_needs_ninety_percent_coverage() {
        let button = el(role::BUTTON, Rect::new(0.0, 0.0, 100.0, 20.0), 0);
        // 85% of the image lies inside the button.
        let image = el(role::IMAGE, Rect::new(-3.0, 0.0, 20.0, 10.0), 1);
        let survivors = deduplicate(vec![button.clone(), image]);
        assert_eq!(ids(&survivors), vec![0, 1]);

        let covered_image = el(role::IMAGE, Rect::new(5.0, 0.0, 90.0, 20.0), 2);
        let survivors = deduplicate(vec![button, covered_image]);
        assert_eq!(ids(&survivors), vec![0]);
    }

    #[test]
    fn disjoint_elements_all_survive() {
        let elements = (0..5)
            .map(|i| el(role::BUTTON, Rect::new(i as f64 * 50.0, 0.0, 40.0, 20.0), i))
            .collect();
        assert_eq!(deduplicate(elements).len(), 5);
    }

    #[test]
    fn zero_area_candidates_are_dropped() {
        let flat = el(role::BUTTON, Rect::new(0.0, 0.0, 40.0, 0.0), 0);
        assert!(deduplicate(vec![flat]).is_empty());
    }

    #[test]
    fn deduplication_is_idempotent() {
        let elements = vec![
            el(role::GROUP, Rect::new(0.0, 0.0, 300.0, 100.0), 0),
            el(role::BUTTON, Rect::new(0.0, 0.0, 290.0, 95.0), 1),
            el(role::STATIC_TEXT, Rect::new(10.0, 10.0, 50.0, 20.0), 2),
            el(role::BUTTON, Rect::new(400.0, 0.0, 60.0, 30.0), 3),
            el(role::IMAGE, Rect::new(430.0, 0.0, 60.0, 30.0), 4),
            el(role::LINK, Rect::new(401.0, 1.0, 59.0, 29.0), 5),
        ];
        let once = deduplicate(elements);
        let twice = deduplicate(once.clone());
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn survivors_never_mutually_overlap_past_threshold() {
        let elements: Vec<_> = (0..40)
            .map(|i| {
                let x = (i % 8) as f64 * 17.0;
                let y = (i / 8) as f64 * 9.0;
                let r = if i % 3 == 0 { role::GROUP } else { role::BUTTON };
                el(r, Rect::new(x, y, 30.0 + (i % 5) as f64, 12.0), i)
            })
            .collect();

        let survivors = deduplicate(elements);
        for (i, a) in survivors.iter().enumerate() {
            for b in &survivors[i + 1..] {
                let overlap = a.bounds.intersection_area(&b.bounds);
                let ra = overlap / a.bounds.area();
                let rb = overlap / b.bounds.area();
                assert!(!(ra > MUTUAL_OVERLAP && rb > MUTUAL_OVERLAP));
            }
        }
    }
}
