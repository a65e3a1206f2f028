//! Built-in handlers, one per interaction mode.

pub mod click;
pub mod inspection;
pub mod measurement;
pub mod navigation;
pub mod placement;

pub use click::{Click, ClickTracker};
pub use inspection::IntelInspectionInputHandler;
pub use measurement::MeasurementInputHandler;
pub use navigation::NavigationInputHandler;
pub use placement::IntelPlacementInputHandler;

use super::handler::InputHandler;
use crate::config::InputConfig;

/// The four built-in handlers, configured from `config`.
pub fn default_handlers(config: &InputConfig) -> Vec<Box<dyn InputHandler>> {
    vec![
        Box::new(NavigationInputHandler::new(config)),
        Box::new(IntelPlacementInputHandler::new(config)),
        Box::new(IntelInspectionInputHandler::new(config)),
        Box::new(MeasurementInputHandler::new(config)),
    ]
}
