use super::Bounds;

/// Anything the layout engine can move and resize.
///
/// Positions are centers of the object's content. The *total* box adds the
/// border and the label, which sits above the content, so the total box
/// center can be offset vertically from the content center; see
/// [`Positionable::center_offset_y`].
pub trait Positionable {
    fn l_bound(&self) -> f64;
    fn r_bound(&self) -> f64;
    fn u_bound(&self) -> f64;
    fn d_bound(&self) -> f64;

    fn total_width(&self) -> f64;
    fn total_height(&self) -> f64;

    fn dest_x(&self) -> f64;
    fn dest_y(&self) -> f64;
    fn dest_width(&self) -> f64;
    fn dest_height(&self) -> f64;

    /// How far the center of the total box sits above the content center.
    fn center_offset_y(&self) -> f64;

    /// Resizes so the total width becomes `width`, preserving aspect ratio.
    fn set_total_width(&mut self, width: f64);
    /// Resizes so the total height becomes `height`, preserving aspect ratio.
    fn set_total_height(&mut self, height: f64);

    /// Repositions immediately, without animation.
    fn set_dest_x(&mut self, x: f64);
    fn set_dest_y(&mut self, y: f64);

    /// Repositions the content center, animated if the object animates.
    fn move_to(&mut self, x: f64, y: f64);

    /// Resizes and moves the object so its total box fits `bounds` as closely
    /// as its aspect ratio allows, centered.
    fn fill_to_rect(&mut self, bounds: Bounds) {
        let aspect = self.total_width() / self.total_height();
        if bounds.aspect() > aspect {
            self.set_total_height(bounds.height());
        } else {
            self.set_total_width(bounds.width());
        }
        let offset = self.center_offset_y();
        self.move_to(bounds.center_x(), bounds.center_y() - offset);
    }
}
