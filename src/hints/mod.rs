//! Platform-neutral hint pipeline: traversal, filtering, labelling, input
//! resolution and the activation loop.

pub mod accessor;
pub mod dedup;
pub mod element;
pub mod geometry;
pub mod labels;
pub mod occlusion;
pub mod orchestrator;
pub mod overlay;
pub mod resolver;
pub mod scanner;
pub mod timer;

#[cfg(test)]
mod mock;

pub use accessor::{Accessibility, AxValue, Pid};
pub use element::{ScanResult, UIElement};
pub use geometry::{Point, Rect, Size};
pub use labels::Alphabet;
pub use orchestrator::{Activation, Desktop, KeyOutcome, Orchestrator, Phase, Timing};
pub use overlay::LabelPlacement;
pub use resolver::KeyInput;
pub use scanner::ScanLimits;
pub use timer::{TimerKind, TimerToken};
