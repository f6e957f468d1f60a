// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The view orchestrator.
//!
//! A [`View`] owns one data set, its geom sequence, the scale and coordinate
//! controllers, and the declarative options tree, and sequences the render pipeline:
//!
//! 1. initialize geoms with the current data (scales resolve demand-driven),
//! 2. run the `before_draw` hook (cross-geom scale unification, region adjustment),
//! 3. build the coordinate transform from the boundary points — strictly after the
//!    hook, because the drawable region may have changed in step 2,
//! 4. paint geoms in insertion order,
//! 5. delegate guide rendering, then axis rendering.
//!
//! The pipeline is synchronous and run-to-completion; ordering guarantees are
//! structural, not concurrency-derived. A render entered while one is already in
//! progress is a contract violation and fails with [`ViewError::ReentrantRender`].

extern crate alloc;

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::Point;
use vista_core::{DataSet, GroupId, Surface, SurfaceError};

use crate::coord::{Coord, CoordCfg, CoordController, CoordKind, CoordSpec};
use crate::diagnostic::Diagnostic;
use crate::geom::{Geom, GeomError, GeomRegistry, Setting};
use crate::options::ViewOptions;
use crate::scale::{Scale, ScaleController, ScaleDef, ScalePool};

/// Stable identifier for a geom attached to a view.
///
/// Removal and configuration address geoms by this identity, never by position.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeomId(u64);

/// Errors surfaced by view operations.
#[derive(Debug)]
pub enum ViewError {
    /// `render` was entered while a render pass was already in progress.
    ReentrantRender,
    /// The container surface failed an allocation or draw.
    Surface(SurfaceError),
    /// A geom failed a lifecycle operation.
    Geom {
        /// The failing geom.
        id: GeomId,
        /// The underlying error.
        error: GeomError,
    },
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReentrantRender => f.write_str("render entered reentrantly"),
            Self::Surface(e) => write!(f, "surface failure: {e}"),
            Self::Geom { id, error } => write!(f, "geom {id:?} failed: {error}"),
        }
    }
}

impl From<SurfaceError> for ViewError {
    fn from(value: SurfaceError) -> Self {
        Self::Surface(value)
    }
}

/// Caller configuration for [`View::new`], merged over defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
    /// Normalized-space origin corner in surface coordinates.
    pub start: Point,
    /// Normalized-space far corner in surface coordinates.
    pub end: Point,
    /// Initial declarative options.
    pub options: ViewOptions,
}

impl Default for ViewConfig {
    fn default() -> Self {
        // The y-flipped unit square: data y grows upward, surface y grows downward.
        Self {
            start: Point::new(0.0, 1.0),
            end: Point::new(1.0, 0.0),
            options: ViewOptions::default(),
        }
    }
}

impl ViewConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the drawable region corners in surface coordinates.
    pub fn with_region(mut self, start: Point, end: Point) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Sets the initial options tree.
    pub fn with_options(mut self, options: ViewOptions) -> Self {
        self.options = options;
        self
    }
}

/// Mutable context handed to the `before_draw` hook.
///
/// The hook runs after geom initialization and before coordinate construction, so it can
/// unify scale domains across geoms and shrink the drawable region (e.g. to reserve
/// guide space) before marks are positioned.
#[derive(Debug)]
pub struct DrawPrep<'a> {
    /// The scale cache, for cross-geom domain unification.
    pub scales: &'a mut ScalePool,
    /// The region origin corner; adjustments apply to this render pass.
    pub start: &'a mut Point,
    /// The region far corner; adjustments apply to this render pass.
    pub end: &'a mut Point,
}

struct GeomSlot {
    id: GeomId,
    group: GroupId,
    geom: Box<dyn Geom>,
}

type BeforeDrawHook = Box<dyn FnMut(&mut DrawPrep<'_>)>;
type RenderHook<S> = Box<dyn FnMut(&mut S, &Coord)>;
type TeardownHook = Box<dyn FnMut()>;

/// The chart-region orchestrator.
///
/// Owns the data set, the geom collection, both controllers, and the options tree;
/// sequences initialization, scale/coordinate construction, geom rendering, and
/// teardown. Generic over the container surface it draws through.
pub struct View<S: Surface> {
    surface: S,
    registry: GeomRegistry,
    start: Point,
    end: Point,
    geoms: Vec<GeomSlot>,
    pool: ScalePool,
    coord_controller: CoordController,
    coord: Option<Coord>,
    options: ViewOptions,
    diagnostics: Vec<Diagnostic>,
    before_draw: Option<BeforeDrawHook>,
    guide_renderer: Option<RenderHook<S>>,
    axis_renderer: Option<RenderHook<S>>,
    teardown: Option<TeardownHook>,
    next_geom_id: u64,
    in_render: bool,
}

impl<S: Surface> fmt::Debug for View<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("geoms", &self.geoms.len())
            .field("cached_scales", &self.pool.cached_count())
            .field("coord", &self.coord)
            .field("options", &self.options)
            .field("diagnostics", &self.diagnostics.len())
            .field("in_render", &self.in_render)
            .finish()
    }
}

impl<S: Surface> View<S> {
    /// Creates a view over a surface with an injected mark registry.
    ///
    /// Applies the configured options (instantiating declared geoms; unknown kinds and
    /// settings become diagnostics) and then constructs fresh controllers seeded from
    /// the options tree. Surface group allocation failures propagate.
    pub fn new(surface: S, registry: GeomRegistry, config: ViewConfig) -> Result<Self, ViewError> {
        let mut view = Self {
            surface,
            registry,
            start: config.start,
            end: config.end,
            geoms: Vec::new(),
            pool: ScalePool::default(),
            coord_controller: CoordController::default(),
            coord: None,
            options: ViewOptions::default(),
            diagnostics: Vec::new(),
            before_draw: None,
            guide_renderer: None,
            axis_renderer: None,
            teardown: None,
            next_geom_id: 0,
            in_render: false,
        };
        view.apply_options(config.options)?;
        view.init_controllers();
        Ok(view)
    }

    /// Replays an options tree into the view.
    ///
    /// Instantiates every declared geom and re-seeds the existing controllers with the
    /// new scale definitions and coordinate descriptor. Construction follows this with
    /// [`Self::init_controllers`], which replaces the controllers wholesale; option
    /// changes after construction deliberately do not.
    fn apply_options(&mut self, options: ViewOptions) -> Result<(), ViewError> {
        self.options = options;
        let declared = self.options.geoms.clone();
        for opt in &declared {
            let Some(mut geom) = self.registry.create(&opt.kind) else {
                self.diagnostics
                    .push(Diagnostic::UnknownGeomKind(opt.kind.clone()));
                continue;
            };
            for (key, setting) in opt.settings() {
                if !geom.configure(key, setting) {
                    self.diagnostics.push(Diagnostic::UnknownGeomSetting {
                        kind: opt.kind.clone(),
                        key: key.clone(),
                    });
                }
            }
            self.add_geom(geom)?;
        }
        self.pool
            .controller_mut()
            .set_defs(self.options.scales.clone());
        self.coord_controller.reset(self.options.coord);
        Ok(())
    }

    fn init_controllers(&mut self) {
        self.pool
            .replace_controller(ScaleController::new(self.options.scales.clone()));
        self.coord_controller = CoordController::new(self.options.coord);
    }

    /// Attaches a geom of a registered kind and returns its id for fluent
    /// configuration.
    ///
    /// Unknown kinds record a diagnostic and return `Ok(None)`.
    pub fn attach(&mut self, kind: &str) -> Result<Option<GeomId>, ViewError> {
        let Some(geom) = self.registry.create(kind) else {
            self.diagnostics
                .push(Diagnostic::UnknownGeomKind(String::from(kind)));
            return Ok(None);
        };
        self.add_geom(geom).map(Some)
    }

    /// Appends a geom, allocating its dedicated surface group.
    pub fn add_geom(&mut self, geom: Box<dyn Geom>) -> Result<GeomId, ViewError> {
        let group = self.surface.add_group()?;
        let id = GeomId(self.next_geom_id);
        self.next_geom_id += 1;
        self.geoms.push(GeomSlot { id, group, geom });
        Ok(id)
    }

    /// Removes a geom by identity, destroying it and releasing its group.
    ///
    /// Returns `false` when no geom carries `id`.
    pub fn remove_geom(&mut self, id: GeomId) -> bool {
        let Some(pos) = self.geoms.iter().position(|s| s.id == id) else {
            return false;
        };
        let mut slot = self.geoms.remove(pos);
        slot.geom.destroy();
        self.surface.release_group(slot.group);
        true
    }

    /// Applies one setting to an attached geom.
    ///
    /// Returns `false` (with a diagnostic for known geoms) when the geom does not
    /// expose the key, or when `id` is unknown.
    pub fn configure_geom(&mut self, id: GeomId, key: &str, setting: impl Into<Setting>) -> bool {
        let setting = setting.into();
        let Some(slot) = self.geoms.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        if slot.geom.configure(key, &setting) {
            return true;
        }
        self.diagnostics.push(Diagnostic::UnknownGeomSetting {
            kind: String::from(slot.geom.kind()),
            key: String::from(key),
        });
        false
    }

    /// Returns the memoized scale for `field`, deriving it on first use.
    ///
    /// Scale identity is stable until the data set changes.
    pub fn create_scale(&mut self, field: &str) -> Rc<Scale> {
        let scale = self.pool.scale(field);
        self.diagnostics.extend(self.pool.take_diagnostics());
        scale
    }

    /// Declares a scale override for one field.
    ///
    /// Merged into the options tree and the controller definitions. Already-created
    /// scales are not invalidated; the override takes effect when scales are next
    /// derived (data change or cache invalidation).
    pub fn scale(&mut self, field: impl Into<String>, def: ScaleDef) {
        let field = field.into();
        self.options.scales.insert(field.clone(), def.clone());
        self.pool.controller_mut().set_def(field, def);
    }

    /// Declares scale overrides for several fields at once (shallow merge).
    pub fn scale_defs(&mut self, defs: HashMap<String, ScaleDef>) {
        for (field, def) in &defs {
            self.options.scales.insert(field.clone(), def.clone());
        }
        self.pool.controller_mut().merge_defs(defs);
    }

    /// Replaces the data set without rendering or invalidating anything.
    pub fn source(&mut self, data: DataSet) {
        self.pool.set_data(Rc::new(data));
    }

    /// Replaces the data set and re-renders.
    ///
    /// The full invalidation sequence: scales are cleared (not merged), every geom's
    /// drawn shapes are wiped (geoms are retained and re-initialized), then the render
    /// pipeline runs against the new data.
    pub fn change_data(&mut self, data: DataSet) -> Result<(), ViewError> {
        self.pool.set_data(Rc::new(data));
        self.clear_inner();
        for slot in &mut self.geoms {
            slot.geom.clear(&mut self.surface, slot.group);
        }
        self.render()
    }

    /// Replaces the options tree and replays it.
    ///
    /// Newly declared geoms are instantiated; both controllers are re-seeded from the
    /// new tree. Controller identity persists (only construction builds fresh ones).
    pub fn change_options(&mut self, options: ViewOptions) -> Result<(), ViewError> {
        self.apply_options(options)
    }

    /// Imperatively overrides the coordinate descriptor.
    ///
    /// Resets the controller immediately and returns it for chaining; the new
    /// descriptor takes effect when the next render rebuilds the transform.
    pub fn coord(&mut self, kind: CoordKind, cfg: CoordCfg) -> &mut CoordController {
        self.coord_controller.reset(CoordSpec { kind, cfg });
        &mut self.coord_controller
    }

    /// Installs the `before_draw` extension point.
    pub fn set_before_draw(&mut self, hook: impl FnMut(&mut DrawPrep<'_>) + 'static) {
        self.before_draw = Some(Box::new(hook));
    }

    /// Installs the guide-rendering delegate, invoked after geoms paint.
    pub fn set_guide_renderer(&mut self, hook: impl FnMut(&mut S, &Coord) + 'static) {
        self.guide_renderer = Some(Box::new(hook));
    }

    /// Installs the axis-rendering delegate, invoked last.
    pub fn set_axis_renderer(&mut self, hook: impl FnMut(&mut S, &Coord) + 'static) {
        self.axis_renderer = Some(Box::new(hook));
    }

    /// Installs the teardown hook run once by [`View::destroy`].
    pub fn set_teardown(&mut self, hook: impl FnMut() + 'static) {
        self.teardown = Some(Box::new(hook));
    }

    /// Runs the render pipeline.
    ///
    /// See the module docs for the strict phase order. A paint failure wipes every geom
    /// already painted in this pass before the error propagates, so no geom is left in
    /// a partially-painted state.
    pub fn render(&mut self) -> Result<(), ViewError> {
        if self.in_render {
            return Err(ViewError::ReentrantRender);
        }
        self.in_render = true;
        let result = self.render_inner();
        self.in_render = false;
        result
    }

    fn render_inner(&mut self) -> Result<(), ViewError> {
        for slot in &mut self.geoms {
            slot.geom.set_data(self.pool.data().clone());
            slot.geom
                .init(&mut self.pool)
                .map_err(|error| ViewError::Geom { id: slot.id, error })?;
        }
        self.diagnostics.extend(self.pool.take_diagnostics());

        if let Some(hook) = self.before_draw.as_mut() {
            let mut prep = DrawPrep {
                scales: &mut self.pool,
                start: &mut self.start,
                end: &mut self.end,
            };
            hook(&mut prep);
            self.diagnostics.extend(self.pool.take_diagnostics());
        }

        // The drawable region may have changed above; only now is the transform built.
        let coord = self.coord_controller.create_coord(self.start, self.end);
        self.coord = Some(coord);

        for i in 0..self.geoms.len() {
            let slot = &mut self.geoms[i];
            slot.geom.set_coord(coord);
            if let Err(error) = slot.geom.paint(&mut self.surface, slot.group) {
                let id = slot.id;
                for painted in &mut self.geoms[..=i] {
                    painted.geom.clear(&mut self.surface, painted.group);
                }
                return Err(ViewError::Geom { id, error });
            }
        }

        if let Some(hook) = self.guide_renderer.as_mut() {
            hook(&mut self.surface, &coord);
        }
        if let Some(hook) = self.axis_renderer.as_mut() {
            hook(&mut self.surface, &coord);
        }
        Ok(())
    }

    /// Destroys every geom in sequence order, clears the surface, and resets the scale
    /// cache and declared geom options.
    pub fn clear(&mut self) {
        for mut slot in self.geoms.drain(..) {
            slot.geom.destroy();
        }
        self.surface.clear();
        self.clear_inner();
    }

    /// Tears the view down: [`View::clear`] plus the teardown hook.
    pub fn destroy(&mut self) {
        self.clear();
        if let Some(mut hook) = self.teardown.take() {
            hook();
        }
    }

    fn clear_inner(&mut self) {
        self.pool.invalidate();
        self.options.geoms.clear();
    }

    /// Returns the number of attached geoms.
    pub fn geom_count(&self) -> usize {
        self.geoms.len()
    }

    /// Returns the attached geom ids in paint order.
    pub fn geom_ids(&self) -> Vec<GeomId> {
        self.geoms.iter().map(|s| s.id).collect()
    }

    /// Returns a geom by identity.
    pub fn geom(&self, id: GeomId) -> Option<&dyn Geom> {
        self.geoms
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.geom.as_ref())
    }

    /// Returns a geom by identity, mutably.
    pub fn geom_mut(&mut self, id: GeomId) -> Option<&mut (dyn Geom + 'static)> {
        self.geoms
            .iter_mut()
            .find(|s| s.id == id)
            .map(|s| s.geom.as_mut())
    }

    /// Returns the surface group owned by a geom.
    pub fn group_of(&self, id: GeomId) -> Option<GroupId> {
        self.geoms.iter().find(|s| s.id == id).map(|s| s.group)
    }

    /// Returns the coordinate transform built by the last render, if any.
    pub fn active_coord(&self) -> Option<Coord> {
        self.coord
    }

    /// Returns the current options tree.
    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    /// Returns the surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Returns `true` when a scale for `field` is currently cached.
    pub fn has_cached_scale(&self, field: &str) -> bool {
        self.pool.has_scale(field)
    }

    /// Returns the number of cached scales.
    pub fn cached_scale_count(&self) -> usize {
        self.pool.cached_count()
    }

    /// Returns the collected diagnostics without draining them.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drains the collected diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        core::mem::take(&mut self.diagnostics)
    }

    /// Returns the drawable region corners.
    pub fn region(&self) -> (Point, Point) {
        (self.start, self.end)
    }

    /// Replaces the drawable region corners; effective on the next render.
    pub fn set_region(&mut self, start: Point, end: Point) {
        self.start = start;
        self.end = end;
    }
}
