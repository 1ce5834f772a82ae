use serde::Serialize;

use super::element::ScanResult;
use super::geometry::Rect;

const INSET_RATIO: f64 = 0.2;
const MAX_INSET: f64 = 12.0;
const CHAR_WIDTH: f64 = 7.0;
const PADDING: f64 = 8.0;
const LABEL_HEIGHT: f64 = 14.0;

/// Where the overlay draws one label, relative to the overlay's screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelPlacement {
    pub label: String,
    pub role: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Labels sit just inside the element's top-left corner; the inset shrinks
/// with the element so tiny controls keep their label on top of them.
pub fn placements<N>(result: &ScanResult<N>, screen: Rect) -> Vec<LabelPlacement> {
    result
        .elements()
        .iter()
        .map(|element| {
            let bounds = element.bounds;
            let inset_x = (bounds.width * INSET_RATIO).min(MAX_INSET);
            let inset_y = (bounds.height * INSET_RATIO).min(MAX_INSET);
            LabelPlacement {
                label: element.label.clone(),
                role: element.role.clone(),
                x: bounds.x + inset_x - screen.x,
                y: bounds.y + inset_y - screen.y,
                width: PADDING + CHAR_WIDTH * element.label.chars().count() as f64,
                height: LABEL_HEIGHT,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hints::element::UIElement;

    fn labelled(label: &str, bounds: Rect) -> UIElement<()> {
        let mut e = UIElement::new("AXButton", bounds, ());
        e.label = label.to_string();
        e
    }

    #[test]
    fn small_elements_get_proportional_inset() {
        let result = ScanResult::new(vec![labelled("A", Rect::new(100.0, 50.0, 20.0, 10.0))]);
        let p = &placements(&result, Rect::new(0.0, 0.0, 1440.0, 900.0))[0];
        assert_eq!((p.x, p.y), (104.0, 52.0));
        assert_eq!(p.width, 15.0);
        assert_eq!(p.height, 14.0);
    }

    #[test]
    fn large_elements_cap_inset_and_offset_by_screen() {
        let result = ScanResult::new(vec![labelled("BA", Rect::new(1540.0, 300.0, 400.0, 200.0))]);
        let p = &placements(&result, Rect::new(1440.0, 0.0, 1920.0, 1080.0))[0];
        assert_eq!((p.x, p.y), (112.0, 312.0));
        assert_eq!(p.width, 22.0);
    }

    #[test]
    fn serializes_camel_case() {
        let result = ScanResult::new(vec![labelled("A", Rect::new(0.0, 0.0, 50.0, 50.0))]);
        let json = serde_json::to_string(&placements(&result, Rect::default())).unwrap();
        assert!(json.contains("\"label\":\"A\""));
        assert!(json.contains("\"width\""));
    }
}
