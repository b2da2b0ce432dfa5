mod engine;
mod error;
pub(crate) mod graph;
pub mod options;
pub mod request;
pub mod systems;

pub use engine::LayoutManager;
pub use error::LayoutError;
pub use graph::{Direction, Orientation};
pub use options::{OptionValue, Options};
pub use request::{Groups, LayoutRequest, Role};
pub use systems::{LayoutMethod, PerimeterSplit, aspect_inner_bounds, grid_dimensions, perimeter_split};
