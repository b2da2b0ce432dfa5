use tracing::debug;

use super::{grid, perimeter};
use crate::common::config::{AspectFocusSettings, FocusSettings, GridSettings, PerimeterSettings};
use crate::layout_engine::LayoutError;
use crate::model::{Bounds, Positionable};

/// Inner box with the configured aspect ratio, as large as `scale` allows
/// along whichever outer dimension constrains it, centered on `outer`.
pub fn aspect_inner_bounds(outer: Bounds, settings: &AspectFocusSettings) -> Bounds {
    let (half_width, half_height) = if settings.aspect >= outer.aspect() {
        let half_width = settings.scale * outer.width() / 2.0;
        (half_width, half_width / settings.aspect)
    } else {
        let half_height = settings.scale * outer.height() / 2.0;
        (half_height * settings.aspect, half_height)
    };
    Bounds::centered(outer.center_x(), outer.center_y(), half_width * 2.0, half_height * 2.0)
}

/// Grids `inners` in the middle of `outer` and rings `outers` around them.
/// Without outers the inners take the whole box.
pub(crate) fn arrange<P: Positionable + ?Sized>(
    outer: Bounds,
    inner: Option<Bounds>,
    settings: &FocusSettings,
    perimeter_settings: &PerimeterSettings,
    inners: &mut [&mut P],
    outers: &mut [&mut P],
) -> Result<(), LayoutError> {
    if outers.is_empty() {
        debug!(count = inners.len(), "no unfocused objects, gridding the whole box");
        return grid::arrange(outer, &GridSettings::default(), inners);
    }

    let inner = inner.unwrap_or_else(|| outer.scaled(settings.scale_x, settings.scale_y));
    let focus_box = inner.scaled(settings.shrink, settings.shrink);
    debug!(?inner, ?focus_box, inners = inners.len(), outers = outers.len(), "focus layout");

    let grid_result = grid::arrange(focus_box, &GridSettings::default(), inners);
    let perimeter_result = perimeter::arrange(outer, inner, perimeter_settings, outers);
    grid_result.and(perimeter_result)
}
