pub mod bounds;
pub mod positionable;
pub mod tile;

pub use bounds::Bounds;
pub use positionable::Positionable;
pub use tile::Tile;
