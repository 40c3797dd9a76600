mod camera;
mod label;
mod nav;
mod project;
mod squarify;
mod state;

pub use camera::{Camera, TransitionLayer, ZoomDirection};
pub use label::wrap_label;
pub use nav::NavigationFrame;
pub use squarify::HEADER_HEIGHT;
pub use state::{ClickOutcome, TreemapState};
