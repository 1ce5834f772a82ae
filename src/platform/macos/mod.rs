pub mod app_switch;
pub mod ax;
pub mod click_listener;
pub mod system;

pub use app_switch::AppSwitchObserver;
pub use ax::{AxNode, MacAx};
pub use click_listener::ClickListener;
