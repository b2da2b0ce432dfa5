//! Shelf bin-packing into a strip.
//!
//! The strip is as wide as the outer box and unbounded below its top edge.
//! The search works in a local frame with `x` growing right from the left
//! edge and `y` growing down from the top edge, over an arena of slots that
//! are placed and unplaced in place while it backtracks.

use tracing::{debug, error, trace};

use crate::common::config::TilingSettings;
use crate::layout_engine::LayoutError;
use crate::model::{Bounds, Positionable};

const EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
struct Slot {
    width: f64,
    height: f64,
    x: f64,
    y: f64,
    placed: bool,
}

impl Slot {
    fn bottom(&self) -> f64 { self.y + self.height }

    fn overlaps_span(&self, xmin: f64, xmax: f64) -> bool {
        self.x < xmax - EPS && self.x + self.width > xmin + EPS
    }
}

/// Free space still to be filled.
#[derive(Debug, Clone, Copy)]
enum Area {
    /// Everything from `ymin` down between `xmin` and `xmax`. Only objects
    /// from position `from` of the search order onwards are tried here.
    Open { xmin: f64, xmax: f64, ymin: f64, from: usize },
    /// The span below whatever has been placed in it by the time the area is
    /// visited, and never above `floor`.
    Below { xmin: f64, xmax: f64, floor: f64 },
}

struct Packer {
    slots: Vec<Slot>,
    /// Slot indices, tallest first, then widest.
    order: Vec<usize>,
    unplaced: usize,
    first_only: bool,
    budget: usize,
    visited: usize,
    best_bottom: f64,
    best: Option<Vec<(f64, f64)>>,
}

impl Packer {
    fn new(sizes: Vec<(f64, f64)>, settings: &TilingSettings) -> Self {
        let slots: Vec<Slot> = sizes
            .into_iter()
            .map(|(width, height)| Slot { width, height, x: 0.0, y: 0.0, placed: false })
            .collect();
        let mut order: Vec<usize> = (0..slots.len()).collect();
        order.sort_by(|&a, &b| {
            slots[b]
                .height
                .total_cmp(&slots[a].height)
                .then(slots[b].width.total_cmp(&slots[a].width))
        });
        Self {
            unplaced: slots.len(),
            first_only: slots.len() > settings.exhaustive_limit,
            budget: settings.search_budget,
            visited: 0,
            best_bottom: f64::INFINITY,
            best: None,
            slots,
            order,
        }
    }

    /// The budget only applies once some packing has been found.
    fn should_stop(&self) -> bool {
        self.best.is_some() && (self.first_only || self.visited >= self.budget)
    }

    fn place(&mut self, index: usize, x: f64, y: f64) {
        let slot = &mut self.slots[index];
        slot.x = x;
        slot.y = y;
        slot.placed = true;
        self.unplaced -= 1;
    }

    fn unplace(&mut self, index: usize) {
        self.slots[index].placed = false;
        self.unplaced += 1;
    }

    /// Top-left corner, right edge and first eligible order position.
    fn resolve(&self, area: Area) -> (f64, f64, f64, usize) {
        match area {
            Area::Open { xmin, xmax, ymin, from } => (xmin, xmax, ymin, from),
            Area::Below { xmin, xmax, floor } => {
                let ymin = self
                    .slots
                    .iter()
                    .filter(|slot| slot.placed && slot.overlaps_span(xmin, xmax))
                    .map(Slot::bottom)
                    .fold(floor, f64::max);
                (xmin, xmax, ymin, 0)
            }
        }
    }

    fn record(&mut self) {
        let bottom = self.slots.iter().map(Slot::bottom).fold(0.0, f64::max);
        if bottom < self.best_bottom {
            trace!(bottom, visited = self.visited, "better packing");
            self.best_bottom = bottom;
            self.best = Some(self.slots.iter().map(|slot| (slot.x, slot.y)).collect());
        }
    }

    fn search(&mut self, pending: &mut Vec<Area>) {
        self.visited += 1;
        if self.unplaced == 0 {
            self.record();
            return;
        }
        if self.should_stop() {
            return;
        }
        let Some(area) = pending.pop() else {
            return;
        };
        let base = pending.len();
        let (xmin, xmax, ymin, from) = self.resolve(area);

        let mut seen: Vec<(f64, f64)> = Vec::new();
        for pos in from..self.order.len() {
            let index = self.order[pos];
            let Slot { width, height, placed, .. } = self.slots[index];
            if placed || width > xmax - xmin + EPS {
                continue;
            }
            if seen.iter().any(|&(w, h)| w == width && h == height) {
                continue;
            }
            seen.push((width, height));
            if ymin + height >= self.best_bottom {
                continue;
            }

            self.place(index, xmin, ymin);
            let right_open = xmax - (xmin + width) > EPS;
            let right = Area::Open { xmin: xmin + width, xmax, ymin, from: pos + 1 };

            pending.push(Area::Below { xmin, xmax, floor: ymin + height });
            if right_open {
                pending.push(right);
            }
            self.search(pending);
            pending.truncate(base);

            if right_open && !self.should_stop() {
                pending.push(Area::Open {
                    xmin,
                    xmax: xmin + width,
                    ymin: ymin + height,
                    from: 0,
                });
                pending.push(right);
                self.search(pending);
                pending.truncate(base);
            }

            self.unplace(index);
            if self.should_stop() {
                break;
            }
        }

        if seen.is_empty() {
            self.search(pending);
            pending.truncate(base);
        }
        pending.push(area);
    }
}

/// Packs `objects` into the strip under the top edge of `outer`, keeping
/// their sizes and minimizing how far down the packing reaches.
pub(crate) fn arrange<P: Positionable + ?Sized>(
    outer: Bounds,
    settings: &TilingSettings,
    objects: &mut [&mut P],
) -> Result<(), LayoutError> {
    if objects.is_empty() {
        error!("tiling layout was passed no objects");
        return Err(LayoutError::Empty);
    }

    let strip = outer.width();
    if let Some((index, object)) =
        objects.iter().enumerate().find(|(_, object)| object.dest_width() > strip + EPS)
    {
        let width = object.dest_width();
        error!(index, width, strip, "object is wider than the tiling strip");
        return Err(LayoutError::TilingInfeasible { index, width, strip });
    }

    if objects.len() == 1 {
        objects[0].fill_to_rect(outer);
        return Ok(());
    }

    let sizes: Vec<(f64, f64)> =
        objects.iter().map(|object| (object.dest_width(), object.dest_height())).collect();
    let mut packer = Packer::new(sizes, settings);
    let mut pending = vec![Area::Open { xmin: 0.0, xmax: strip, ymin: 0.0, from: 0 }];
    packer.search(&mut pending);

    let Some(positions) = packer.best.take() else {
        // Unreachable while the widest object fits: a pure shelf packing
        // always completes before the budget is consulted.
        let (index, width) = packer
            .slots
            .iter()
            .map(|slot| slot.width)
            .enumerate()
            .fold((0, 0.0), |acc, (i, w)| if w > acc.1 { (i, w) } else { acc });
        error!(visited = packer.visited, "tiling search found no packing");
        return Err(LayoutError::TilingInfeasible { index, width, strip });
    };
    debug!(
        count = objects.len(),
        bottom = packer.best_bottom,
        visited = packer.visited,
        exhaustive = !packer.first_only,
        "tiling packed"
    );

    for (object, (slot, (x, y))) in objects.iter_mut().zip(packer.slots.iter().zip(positions)) {
        let center_x = outer.l + x + slot.width / 2.0;
        let center_y = outer.u - y - slot.height / 2.0 - object.center_offset_y();
        if settings.animate {
            object.move_to(center_x, center_y);
        } else {
            object.set_dest_x(center_x);
            object.set_dest_y(center_y);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;
    use crate::model::Tile;

    fn strip(width: f64) -> Bounds { Bounds::new(0.0, width, 10.0, -10.0) }

    fn arrange_tiles(outer: Bounds, settings: &TilingSettings, tiles: &mut [Tile]) -> Result<(), LayoutError> {
        let mut objects: Vec<&mut Tile> = tiles.iter_mut().collect();
        arrange(outer, settings, &mut objects)
    }

    fn lowest_edge(tiles: &[Tile]) -> f64 {
        tiles.iter().map(|tile| tile.d_bound()).fold(f64::INFINITY, f64::min)
    }

    fn assert_packed(outer: Bounds, tiles: &[Tile]) {
        for (i, a) in tiles.iter().enumerate() {
            let bounds = Bounds::of(a);
            assert!(bounds.l >= outer.l - EPS && bounds.r <= outer.r + EPS, "{a:?} leaves the strip");
            assert!(bounds.u <= outer.u + EPS, "{a:?} is above the strip");
            for b in &tiles[i + 1..] {
                assert!(!bounds.intersects(&Bounds::of(b), EPS), "{a:?} overlaps {b:?}");
            }
        }
    }

    fn mixed(count: usize) -> Vec<Tile> {
        (0..count)
            .map(|i| {
                let width = (1 + (i * 7) % 5) as f64 * 0.5;
                let height = (1 + (i * 3) % 4) as f64 * 0.5;
                Tile::new(format!("t{i}"), width, height)
            })
            .collect()
    }

    #[test]
    fn packings_are_complete_and_disjoint() {
        let outer = strip(4.0);
        for count in 2..=8 {
            let mut tiles = mixed(count);
            let sizes: Vec<(f64, f64)> = tiles.iter().map(|t| (t.width(), t.height())).collect();

            arrange_tiles(outer, &TilingSettings::default(), &mut tiles).unwrap();

            let after: Vec<(f64, f64)> = tiles.iter().map(|t| (t.width(), t.height())).collect();
            assert_eq!(after, sizes, "tiling must not resize");
            assert_packed(outer, &tiles);
        }
    }

    #[test]
    fn equal_objects_share_the_top_row() {
        let mut tiles = vec![Tile::new("a", 2.0, 1.0), Tile::new("b", 2.0, 1.0)];

        arrange_tiles(strip(4.0), &TilingSettings::default(), &mut tiles).unwrap();

        assert_eq!((tiles[0].dest_x(), tiles[0].dest_y()), (1.0, 9.5));
        assert_eq!((tiles[1].dest_x(), tiles[1].dest_y()), (3.0, 9.5));
    }

    #[test]
    fn small_objects_stack_beside_a_tall_one() {
        let mut tiles = vec![
            Tile::new("small-1", 1.0, 1.0),
            Tile::new("tall", 2.0, 2.0),
            Tile::new("small-2", 1.0, 1.0),
        ];

        arrange_tiles(strip(3.0), &TilingSettings::default(), &mut tiles).unwrap();

        assert_packed(strip(3.0), &tiles);
        assert!((lowest_edge(&tiles) - 8.0).abs() < EPS);
        assert_eq!((tiles[1].dest_x(), tiles[1].dest_y()), (1.0, 9.0));
    }

    #[test]
    fn input_order_does_not_matter() {
        let mut forward = mixed(5);
        let mut backward: Vec<Tile> = forward.iter().rev().cloned().collect();

        arrange_tiles(strip(4.0), &TilingSettings::default(), &mut forward).unwrap();
        arrange_tiles(strip(4.0), &TilingSettings::default(), &mut backward).unwrap();

        assert!((lowest_edge(&forward) - lowest_edge(&backward)).abs() < EPS);
    }

    #[test]
    fn exhaustive_search_is_never_worse_than_the_first_packing() {
        let outer = strip(4.0);
        let mut exhaustive = mixed(7);
        let mut first = exhaustive.clone();
        let first_only = TilingSettings { exhaustive_limit: 0, ..TilingSettings::default() };

        arrange_tiles(outer, &TilingSettings::default(), &mut exhaustive).unwrap();
        arrange_tiles(outer, &first_only, &mut first).unwrap();

        assert_packed(outer, &first);
        assert!(lowest_edge(&exhaustive) >= lowest_edge(&first) - EPS);
    }

    #[test]
    fn labels_stay_inside_the_packing() {
        let outer = strip(4.0);
        let mut tiles: Vec<Tile> = mixed(4).into_iter().map(|t| t.with_label(0.3).with_border(0.1)).collect();

        arrange_tiles(outer, &TilingSettings::default(), &mut tiles).unwrap();

        assert_packed(outer, &tiles);
        assert!(tiles.iter().any(|t| (t.u_bound() - outer.u).abs() < EPS));
    }

    #[test]
    fn arranging_twice_does_not_drift() {
        let outer = strip(4.0);
        let mut tiles = mixed(6);

        arrange_tiles(outer, &TilingSettings::default(), &mut tiles).unwrap();
        let first = tiles.clone();
        arrange_tiles(outer, &TilingSettings::default(), &mut tiles).unwrap();

        assert_eq!(tiles, first);
    }

    #[test]
    fn single_object_fills_the_box() {
        let outer = strip(4.0);
        let mut expected = Tile::new("a", 1.0, 3.0);
        let mut tiles = vec![expected.clone()];
        expected.fill_to_rect(outer);

        arrange_tiles(outer, &TilingSettings::default(), &mut tiles).unwrap();

        assert_eq!(tiles[0], expected);
    }

    #[test]
    fn empty_input_fails() {
        let mut tiles: Vec<Tile> = Vec::new();
        assert_eq!(
            arrange_tiles(strip(4.0), &TilingSettings::default(), &mut tiles),
            Err(LayoutError::Empty)
        );
    }

    #[test]
    fn too_wide_objects_fail_without_touching_anything() {
        let mut tiles = vec![Tile::new("a", 1.0, 1.0), Tile::new("b", 5.0, 1.0)];
        let before = tiles.clone();

        let result = arrange_tiles(strip(4.0), &TilingSettings::default(), &mut tiles);

        assert_eq!(result, Err(LayoutError::TilingInfeasible { index: 1, width: 5.0, strip: 4.0 }));
        assert_eq!(tiles, before);
    }

    #[test]
    fn animation_can_be_skipped() {
        let make = || vec![Tile::new("a", 1.0, 1.0).animated(true), Tile::new("b", 1.0, 1.0).animated(true)];

        let mut animated = make();
        arrange_tiles(strip(4.0), &TilingSettings::default(), &mut animated).unwrap();
        assert!(animated.iter().all(|t| !t.is_settled()));

        let mut immediate = make();
        let settings = TilingSettings { animate: false, ..TilingSettings::default() };
        arrange_tiles(strip(4.0), &settings, &mut immediate).unwrap();
        assert!(immediate.iter().all(Tile::is_settled));
        assert_eq!(
            immediate.iter().map(|t| (t.dest_x(), t.dest_y())).collect::<Vec<_>>(),
            animated.iter().map(|t| (t.dest_x(), t.dest_y())).collect::<Vec<_>>()
        );
    }
}
