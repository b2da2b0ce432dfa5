use tracing::{debug, warn};

use super::grid;
use crate::common::config::{GridSettings, PerimeterSettings};
use crate::layout_engine::{Direction, LayoutError};
use crate::model::{Bounds, Positionable};

/// Room kept free above the top row for name labels.
const TOP_LABEL_MARGIN: f64 = 0.8;

/// How many objects go on each side of the inner box. The right and left
/// sides share `side` as their cell count; `left` is what is actually left
/// over for the left side and never exceeds `side`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerimeterSplit {
    pub top: usize,
    pub side: usize,
    pub bottom: usize,
    pub left: usize,
}

impl PerimeterSplit {
    pub fn total(&self) -> usize { self.top + self.side + self.bottom + self.left }
}

/// Splits `count` objects between the four sides in proportion to the top
/// edge length and the side height available around `inner`.
pub fn perimeter_split(count: usize, outer: Bounds, inner: Bounds) -> PerimeterSplit {
    match count {
        0 => return PerimeterSplit { top: 0, side: 0, bottom: 0, left: 0 },
        1 => return PerimeterSplit { top: 1, side: 0, bottom: 0, left: 0 },
        _ => {}
    }

    let inner_width = inner.width();
    let outer_height = outer.height();
    let top_ratio = inner_width / (outer_height + inner_width);
    let side_ratio = outer_height / (outer_height + inner_width);
    let half = count as f64 / 2.0;

    let top = ((top_ratio * half).floor() as usize).min(count);
    let side = ((side_ratio * half).ceil() as usize).min(count - top);
    let bottom = count.saturating_sub(top + side * 2);
    let left = count - top - side - bottom;
    PerimeterSplit { top, side, bottom, left }
}

fn arrange_region<P: Positionable + ?Sized>(
    side: Direction,
    bounds: Bounds,
    settings: GridSettings,
    objects: &mut [&mut P],
) -> Result<(), LayoutError> {
    if objects.is_empty() {
        return Ok(());
    }
    debug!(?side, count = objects.len(), ?bounds, "arranging perimeter region");
    grid::arrange(bounds, &settings, objects)
}

/// Arranges `objects` around `inner`, within `outer`: top row left to right,
/// right column top to bottom, then bottom row and left column continuing the
/// loop so the order reads clockwise.
pub(crate) fn arrange<P: Positionable + ?Sized>(
    outer: Bounds,
    inner: Bounds,
    settings: &PerimeterSettings,
    objects: &mut [&mut P],
) -> Result<(), LayoutError> {
    let split = perimeter_split(objects.len(), outer, inner);
    debug!(?split, "perimeter split");

    let (top, rest) = objects.split_at_mut(split.top);
    let (right, rest) = rest.split_at_mut(split.side);
    let (bottom, left) = rest.split_at_mut(split.bottom);
    let mut bottom: Vec<&mut P> = bottom.iter_mut().rev().map(|object| &mut **object).collect();
    let mut left: Vec<&mut P> = left.iter_mut().rev().map(|object| &mut **object).collect();

    let top_result = arrange_region(
        Direction::Up,
        Bounds::new(inner.l, inner.r, outer.u - TOP_LABEL_MARGIN, inner.u),
        GridSettings::line(Direction::Up.orientation(), false, split.top),
        top,
    );
    let right_result = arrange_region(
        Direction::Right,
        Bounds::new(inner.r, outer.r, outer.u, outer.d),
        GridSettings::line(Direction::Right.orientation(), true, split.side),
        right,
    );
    let bottom_result = arrange_region(
        Direction::Down,
        Bounds::new(inner.l, inner.r, inner.d, outer.d),
        GridSettings::line(Direction::Down.orientation(), false, split.bottom),
        &mut bottom,
    );
    let left_result = arrange_region(
        Direction::Left,
        Bounds::new(outer.l, inner.l, outer.u, outer.d),
        GridSettings::line(Direction::Left.orientation(), true, split.side),
        &mut left,
    );

    region_status([top_result, right_result, bottom_result, left_result], settings)
}

/// Every region must succeed, unless `legacy_status` asks for the old
/// always-succeed behavior. With the split above no region can currently
/// fail, so the flag only matters if that changes.
fn region_status(results: [Result<(), LayoutError>; 4], settings: &PerimeterSettings) -> Result<(), LayoutError> {
    match results.into_iter().collect::<Result<(), LayoutError>>() {
        Err(err) if settings.legacy_status => {
            warn!(%err, "ignoring failed perimeter region");
            Ok(())
        }
        result => result,
    }
}
