use tracing::{debug, error, trace};

use crate::common::config::GridSettings;
use crate::layout_engine::{LayoutError, Orientation};
use crate::model::{Bounds, Positionable};

/// Inset of the outermost cell centers in edge mode, on top of half a cell.
const EDGE_MARGIN: f64 = 0.2;
/// Resized objects take this share of their cell so neighbours never touch.
const CELL_FILL: f64 = 0.95;

/// Columns and rows for `count` objects. Zero for both means square-ish:
/// `ceil(sqrt(count))` columns and as many rows as that needs.
pub fn grid_dimensions(count: usize, num_x: usize, num_y: usize) -> (usize, usize) {
    if num_x != 0 || num_y != 0 {
        return (num_x, num_y);
    }
    let num_x = (count as f64).sqrt().ceil() as usize;
    let num_y = if num_x == 0 { 0 } else { count.div_ceil(num_x) };
    (num_x, num_y)
}

/// Cell geometry along the advance axis (x for rows, y for columns) and the
/// cross axis. The cursor starts at the first cell center.
struct GridGeometry {
    orientation: Orientation,
    edge: bool,
    outer: Bounds,
    span: f64,
    stride: f64,
    /// Edge-mode first and last cell centers on the advance axis.
    edge_first: f64,
    edge_last: f64,
    cursor_x: f64,
    cursor_y: f64,
}

impl GridGeometry {
    fn new(outer: Bounds, settings: &GridSettings, num_x: usize, num_y: usize) -> Self {
        let edge = settings.edge;
        match settings.orientation {
            Orientation::Horizontal => {
                let span = outer.height() / num_y as f64;
                let mut stride = outer.width() / num_x as f64;
                let edge_first = outer.l + EDGE_MARGIN + stride / 2.0;
                let edge_last = outer.r - EDGE_MARGIN - stride / 2.0;
                if edge {
                    stride = (edge_last - edge_first) / gaps(num_x);
                }
                let cursor_x = if num_x == 1 {
                    outer.center_x()
                } else if edge {
                    edge_first
                } else {
                    outer.l + stride / 2.0
                };
                Self {
                    orientation: settings.orientation,
                    edge,
                    outer,
                    span,
                    stride,
                    edge_first,
                    edge_last,
                    cursor_x,
                    cursor_y: outer.u - span / 2.0,
                }
            }
            Orientation::Vertical => {
                let span = outer.width() / num_x as f64;
                let mut stride = outer.height() / num_y as f64;
                let edge_first = outer.u - EDGE_MARGIN - stride / 2.0;
                let edge_last = outer.d + EDGE_MARGIN + stride / 2.0;
                if edge {
                    stride = (edge_first - edge_last) / gaps(num_y);
                }
                let cursor_y = if num_y == 1 {
                    outer.center_y()
                } else if edge {
                    edge_first
                } else {
                    outer.u - stride / 2.0
                };
                Self {
                    orientation: settings.orientation,
                    edge,
                    outer,
                    span,
                    stride,
                    edge_first,
                    edge_last,
                    cursor_x: outer.l + span / 2.0,
                    cursor_y,
                }
            }
        }
    }

    /// Cell width, cell height and width over height.
    fn cell(&self) -> (f64, f64, f64) {
        match self.orientation {
            Orientation::Horizontal => (self.stride, self.span, self.stride / self.span),
            Orientation::Vertical => (self.span, self.stride, self.span / self.stride),
        }
    }

    /// Moves the cursor past object `index`. `per_line` is the row (or
    /// column) length and `remaining` the objects still to place after it.
    fn advance(&mut self, index: usize, per_line: usize, remaining: usize) {
        let line_done = (index + 1) % per_line == 0;
        match self.orientation {
            Orientation::Horizontal => {
                self.cursor_x += self.stride;
                if line_done {
                    self.cursor_y -= self.span;
                    if remaining < per_line {
                        self.stride = self.short_line_stride(remaining);
                    }
                    self.cursor_x = self.outer.l + self.stride / 2.0;
                }
            }
            Orientation::Vertical => {
                self.cursor_y -= self.stride;
                if line_done {
                    self.cursor_x += self.span;
                    if remaining < per_line {
                        self.stride = self.short_line_stride(remaining);
                    }
                    self.cursor_y = self.outer.u - self.stride / 2.0;
                }
            }
        }
    }

    /// Stride that spreads a short last line over the whole advance axis.
    /// Both orientations group the range before dividing.
    fn short_line_stride(&self, remaining: usize) -> f64 {
        let (edge_range, full_range) = match self.orientation {
            Orientation::Horizontal => (self.edge_last - self.edge_first, self.outer.width()),
            Orientation::Vertical => (self.edge_first - self.edge_last, self.outer.height()),
        };
        if self.edge {
            edge_range / gaps(remaining)
        } else {
            full_range / remaining as f64
        }
    }
}

/// Gaps between `cells` evenly spaced centers, never less than one.
fn gaps(cells: usize) -> f64 { cells.saturating_sub(1).max(1) as f64 }

/// Lays `objects` out in a grid over `outer`.
///
/// Nothing is touched when the grid cannot hold every object.
pub(crate) fn arrange<P: Positionable + ?Sized>(
    outer: Bounds,
    settings: &GridSettings,
    objects: &mut [&mut P],
) -> Result<(), LayoutError> {
    let count = objects.len();
    if count == 0 {
        error!("grid layout was passed no objects");
        return Err(LayoutError::Empty);
    }

    let (num_x, num_y) = grid_dimensions(count, settings.num_x, settings.num_y);
    // A product past usize::MAX holds any count.
    let slots = num_x.checked_mul(num_y).unwrap_or(usize::MAX);
    if count > slots {
        error!(count, num_x, num_y, "too many objects for grid");
        return Err(LayoutError::Capacity { objects: count, slots });
    }

    if count == 1 {
        objects[0].fill_to_rect(outer);
        return Ok(());
    }

    let mut geometry = GridGeometry::new(outer, settings, num_x, num_y);
    debug!(
        count,
        num_x,
        num_y,
        span = geometry.span,
        stride = geometry.stride,
        "grid arrangement"
    );

    if settings.resize {
        let (cell_width, cell_height, cell_aspect) = geometry.cell();
        for object in objects.iter_mut() {
            let object_aspect = object.total_width() / object.total_height();
            if cell_aspect > object_aspect {
                object.set_total_height(cell_height * CELL_FILL);
            } else {
                object.set_total_width(cell_width * CELL_FILL);
            }
        }
    }

    let per_line = match settings.orientation {
        Orientation::Horizontal => num_x,
        Orientation::Vertical => num_y,
    };
    for (index, object) in objects.iter_mut().enumerate() {
        let x = geometry.cursor_x;
        let y = geometry.cursor_y - object.center_offset_y();
        trace!(index, x, y, "moving grid object");
        object.move_to(x, y);
        geometry.advance(index, per_line, count - index - 1);
    }

    Ok(())
}
