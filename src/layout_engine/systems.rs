use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub(crate) mod focus;
pub(crate) mod grid;
pub(crate) mod perimeter;
pub(crate) mod tiling;

pub use focus::aspect_inner_bounds;
pub use grid::grid_dimensions;
pub use perimeter::{PerimeterSplit, perimeter_split};

/// The available arrangements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum LayoutMethod {
    /// Ring the objects around an inner box.
    Perimeter,
    /// Rows and columns filling the outer box.
    Grid,
    /// Focused objects gridded in the middle, the rest on the perimeter.
    Focus,
    /// [`LayoutMethod::Focus`] with the inner box derived from an aspect ratio.
    AspectFocus,
    /// Shelf bin-packing that keeps object sizes.
    Tiling,
}

impl LayoutMethod {
    pub const ALL: [LayoutMethod; 5] = [
        LayoutMethod::Perimeter,
        LayoutMethod::Grid,
        LayoutMethod::Focus,
        LayoutMethod::AspectFocus,
        LayoutMethod::Tiling,
    ];

    pub fn requires_inner(self) -> bool { self == LayoutMethod::Perimeter }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn method_names_round_trip() {
        for method in LayoutMethod::ALL {
            assert_eq!(method.to_string().parse::<LayoutMethod>(), Ok(method));
        }
        assert_eq!("aspectFocus".parse::<LayoutMethod>(), Ok(LayoutMethod::AspectFocus));
        assert!("spiral".parse::<LayoutMethod>().is_err());
    }
}
