use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Rows fill left to right, then advance downward.
    #[default]
    Horizontal,
    /// Columns fill top to bottom, then advance rightward.
    Vertical,
}

impl Orientation {
    pub fn from_horiz(horiz: bool) -> Self {
        if horiz {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }
}

/// Side of the inner box a perimeter region sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// How a region on this side lays out its cells.
    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Left | Direction::Right => Orientation::Vertical,
            Direction::Up | Direction::Down => Orientation::Horizontal,
        }
    }
}
