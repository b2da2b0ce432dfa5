use serde::Serialize;

use super::Positionable;

/// A video tile: a content rectangle with a border around it and a name label
/// stacked above the top border.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub name: String,
    x: f64,
    y: f64,
    dest_x: f64,
    dest_y: f64,
    width: f64,
    height: f64,
    border: f64,
    label: f64,
    #[serde(skip)]
    aspect: f64,
    #[serde(skip)]
    animated: bool,
}

impl Tile {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            x: 0.0,
            y: 0.0,
            dest_x: 0.0,
            dest_y: 0.0,
            width,
            height,
            border: 0.0,
            label: 0.0,
            aspect: width / height,
            animated: false,
        }
    }

    pub fn with_border(mut self, border: f64) -> Self {
        self.border = border;
        self
    }

    pub fn with_label(mut self, label: f64) -> Self {
        self.label = label;
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self.dest_x = x;
        self.dest_y = y;
        self
    }

    /// Animated tiles only record the destination on `move_to`; the renderer
    /// catches up and calls [`Tile::settle`].
    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    pub fn x(&self) -> f64 { self.x }

    pub fn y(&self) -> f64 { self.y }

    pub fn width(&self) -> f64 { self.width }

    pub fn height(&self) -> f64 { self.height }

    pub fn is_settled(&self) -> bool { self.x == self.dest_x && self.y == self.dest_y }

    pub fn settle(&mut self) {
        self.x = self.dest_x;
        self.y = self.dest_y;
    }
}

impl Positionable for Tile {
    fn l_bound(&self) -> f64 { self.dest_x - self.total_width() / 2.0 }

    fn r_bound(&self) -> f64 { self.dest_x + self.total_width() / 2.0 }

    fn u_bound(&self) -> f64 {
        self.dest_y + self.center_offset_y() + self.total_height() / 2.0
    }

    fn d_bound(&self) -> f64 {
        self.dest_y + self.center_offset_y() - self.total_height() / 2.0
    }

    fn total_width(&self) -> f64 { self.width + self.border * 2.0 }

    fn total_height(&self) -> f64 { self.height + self.border * 2.0 + self.label }

    fn dest_x(&self) -> f64 { self.dest_x }

    fn dest_y(&self) -> f64 { self.dest_y }

    fn dest_width(&self) -> f64 { self.total_width() }

    fn dest_height(&self) -> f64 { self.total_height() }

    fn center_offset_y(&self) -> f64 { self.label / 2.0 }

    fn set_total_width(&mut self, width: f64) {
        self.width = (width - self.border * 2.0).max(0.0);
        self.height = self.width / self.aspect;
    }

    fn set_total_height(&mut self, height: f64) {
        self.height = (height - self.border * 2.0 - self.label).max(0.0);
        self.width = self.height * self.aspect;
    }

    fn set_dest_x(&mut self, x: f64) {
        self.x = x;
        self.dest_x = x;
    }

    fn set_dest_y(&mut self, y: f64) {
        self.y = y;
        self.dest_y = y;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.dest_x = x;
        self.dest_y = y;
        if !self.animated {
            self.settle();
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::model::Bounds;

    #[test]
    fn resize_preserves_content_aspect() {
        let mut tile = Tile::new("a", 4.0, 3.0).with_border(0.5).with_label(1.0);
        tile.set_total_width(9.0);
        assert!((tile.width() - 8.0).abs() < 1e-9);
        assert!((tile.height() - 6.0).abs() < 1e-9);

        tile.set_total_height(5.0);
        assert!((tile.height() - 3.0).abs() < 1e-9);
        assert!((tile.width() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn label_shifts_total_box_up() {
        let tile = Tile::new("a", 2.0, 2.0).with_label(1.0).with_position(0.0, 0.0);
        assert_eq!(tile.u_bound(), 2.0);
        assert_eq!(tile.d_bound(), -1.0);
    }

    #[test]
    fn fill_to_rect_centers_total_box() {
        let mut tile = Tile::new("a", 2.0, 1.0).with_label(0.5);
        let target = Bounds::new(0.0, 10.0, 10.0, 0.0);
        tile.fill_to_rect(target);

        assert!((tile.total_width() - 10.0).abs() < 1e-9);
        let total = Bounds::of(&tile);
        assert!((total.center_x() - 5.0).abs() < 1e-9);
        assert!((total.center_y() - 5.0).abs() < 1e-9);
        assert!(target.contains(&total, 1e-9));
    }

    #[test]
    fn animated_move_waits_for_settle() {
        let mut tile = Tile::new("a", 1.0, 1.0).animated(true);
        tile.move_to(3.0, 4.0);
        assert!(!tile.is_settled());
        assert_eq!(tile.dest_x(), 3.0);
        assert_eq!(tile.x(), 0.0);

        tile.settle();
        assert_eq!((tile.x(), tile.y()), (3.0, 4.0));

        tile.set_dest_x(-1.0);
        assert_eq!(tile.x(), -1.0);
    }
}
