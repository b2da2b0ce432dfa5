use tracing::{debug, error, instrument};

use super::options::Options;
use super::request::{Groups, LayoutRequest, Role};
use super::systems::{LayoutMethod, aspect_inner_bounds, focus, grid, perimeter, tiling};
use super::LayoutError;
use crate::common::config::{GridSettings, LayoutSettings};
use crate::model::{Bounds, Positionable};

fn log_rejected<T>(result: Result<T, LayoutError>) -> Result<T, LayoutError> {
    result.inspect_err(|err| error!(%err, "rejected layout options"))
}

/// Entry point for every layout. Holds the configured defaults that per-call
/// options are merged over; otherwise stateless.
#[derive(Debug, Clone, Default)]
pub struct LayoutManager {
    settings: LayoutSettings,
}

impl LayoutManager {
    pub fn new(settings: LayoutSettings) -> Self { Self { settings } }

    pub fn settings(&self) -> &LayoutSettings { &self.settings }

    /// Runs `method` over the objects in `groups`. Missing roles and bad
    /// options are reported before any object is touched.
    #[instrument(skip_all, fields(%method))]
    pub fn arrange<P: Positionable + ?Sized>(
        &self,
        method: LayoutMethod,
        outer: Bounds,
        inner: Option<Bounds>,
        groups: &mut Groups<'_, P>,
        options: &Options,
    ) -> Result<(), LayoutError> {
        debug!(?outer, ?inner, options = options.len(), "arranging");
        match method {
            LayoutMethod::Perimeter => {
                let Some(inner) = inner else {
                    error!("perimeter layout needs an inner box");
                    return Err(LayoutError::MissingInnerBounds(method));
                };
                self.perimeter_arrange(outer, inner, groups, options)
            }
            LayoutMethod::Grid => {
                let settings = log_rejected(self.settings.grid.merged(options))?;
                self.grid_arrange(outer, groups, &settings)
            }
            LayoutMethod::Focus => self.focus(outer, inner, groups, options),
            LayoutMethod::AspectFocus => self.aspect_focus(outer, groups, options),
            LayoutMethod::Tiling => self.tiling_arrange(outer, groups, options),
        }
    }

    /// [`LayoutManager::arrange`] with the method given by name.
    pub fn arrange_named<P: Positionable + ?Sized>(
        &self,
        name: &str,
        outer: Bounds,
        inner: Option<Bounds>,
        groups: &mut Groups<'_, P>,
        options: &Options,
    ) -> Result<(), LayoutError> {
        let Ok(method) = name.parse::<LayoutMethod>() else {
            error!(name, "layout method not found");
            return Err(LayoutError::UnknownMethod(name.to_string()));
        };
        self.arrange(method, outer, inner, groups, options)
    }

    /// [`LayoutManager::arrange`] with the boxes taken from positioned objects.
    pub fn arrange_around<P, O, I>(
        &self,
        method: LayoutMethod,
        outer: &O,
        inner: Option<&I>,
        groups: &mut Groups<'_, P>,
        options: &Options,
    ) -> Result<(), LayoutError>
    where
        P: Positionable + ?Sized,
        O: Positionable + ?Sized,
        I: Positionable + ?Sized,
    {
        let inner = inner.map(Bounds::of);
        self.arrange(method, Bounds::of(outer), inner, groups, options)
    }

    pub fn run<P: Positionable + ?Sized>(&self, request: &mut LayoutRequest<'_, P>) -> Result<(), LayoutError> {
        self.arrange(
            request.method,
            request.outer,
            request.inner,
            &mut request.groups,
            &request.options,
        )
    }

    pub fn grid_arrange<P: Positionable + ?Sized>(
        &self,
        outer: Bounds,
        groups: &mut Groups<'_, P>,
        settings: &GridSettings,
    ) -> Result<(), LayoutError> {
        let objects = groups.require(Role::Objects, LayoutMethod::Grid)?;
        grid::arrange(outer, settings, objects)
    }

    pub fn perimeter_arrange<P: Positionable + ?Sized>(
        &self,
        outer: Bounds,
        inner: Bounds,
        groups: &mut Groups<'_, P>,
        options: &Options,
    ) -> Result<(), LayoutError> {
        let settings = log_rejected(self.settings.perimeter.merged(options))?;
        let objects = groups.require(Role::Objects, LayoutMethod::Perimeter)?;
        perimeter::arrange(outer, inner, &settings, objects)
    }

    /// Without an inner box one is derived from the `scaleX`/`scaleY` options.
    pub fn focus<P: Positionable + ?Sized>(
        &self,
        outer: Bounds,
        inner: Option<Bounds>,
        groups: &mut Groups<'_, P>,
        options: &Options,
    ) -> Result<(), LayoutError> {
        self.focus_with(LayoutMethod::Focus, outer, inner, groups, options)
    }

    pub fn aspect_focus<P: Positionable + ?Sized>(
        &self,
        outer: Bounds,
        groups: &mut Groups<'_, P>,
        options: &Options,
    ) -> Result<(), LayoutError> {
        let settings = log_rejected(self.settings.aspect_focus.merged(options))?;
        let inner = aspect_inner_bounds(outer, &settings);
        debug!(?inner, aspect = settings.aspect, scale = settings.scale, "derived focus box");
        self.focus_with(LayoutMethod::AspectFocus, outer, Some(inner), groups, options)
    }

    fn focus_with<P: Positionable + ?Sized>(
        &self,
        method: LayoutMethod,
        outer: Bounds,
        inner: Option<Bounds>,
        groups: &mut Groups<'_, P>,
        options: &Options,
    ) -> Result<(), LayoutError> {
        let settings = log_rejected(self.settings.focus.merged(options))?;
        let perimeter_settings = log_rejected(self.settings.perimeter.merged(options))?;
        let (inners, outers) = groups.require_pair(Role::Inners, Role::Outers, method)?;
        focus::arrange(outer, inner, &settings, &perimeter_settings, inners, outers)
    }

    pub fn tiling_arrange<P: Positionable + ?Sized>(
        &self,
        outer: Bounds,
        groups: &mut Groups<'_, P>,
        options: &Options,
    ) -> Result<(), LayoutError> {
        let settings = log_rejected(self.settings.tiling.merged(options))?;
        let objects = groups.require(Role::Objects, LayoutMethod::Tiling)?;
        tiling::arrange(outer, &settings, objects)
    }
}
