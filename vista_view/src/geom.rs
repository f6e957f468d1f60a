// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The geom (visual mark) lifecycle contract.
//!
//! A geom is a pluggable mark unit owned by exactly one view. The view drives it
//! through a fixed lifecycle:
//!
//! ```text
//! Unattached -> Initialized -> Painted -> Cleared -> Destroyed
//!                   ^                        |
//!                   +------------------------+   (re-init on the next render)
//! ```
//!
//! `Destroyed` is terminal; any lifecycle call afterwards is a sequencing violation and
//! fails with [`GeomError::Lifecycle`]. The public render path can never produce such a
//! call; hitting one means a caller drove a geom outside its owning view.

extern crate alloc;

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use peniko::Color;
use vista_core::{DataSet, GroupId, Surface, SurfaceError};

use crate::coord::Coord;
use crate::scale::ScalePool;

/// Lifecycle states of a geom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeomState {
    /// Constructed, not yet initialized with data.
    Unattached,
    /// Holds data and resolved scales; ready to paint once a coordinate is installed.
    Initialized,
    /// Shapes are drawn into the owned group.
    Painted,
    /// Shapes wiped; initialized state retained, reusable on the next render.
    Cleared,
    /// Terminal: resources released, no lifecycle call is valid anymore.
    Destroyed,
}

/// Errors raised by geom lifecycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeomError {
    /// A lifecycle method was called in a state that does not permit it.
    Lifecycle {
        /// The operation that was attempted.
        op: &'static str,
        /// The state the geom was in.
        state: GeomState,
    },
    /// The drawing surface rejected an operation.
    Surface(SurfaceError),
}

impl fmt::Display for GeomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lifecycle { op, state } => {
                write!(f, "geom lifecycle violation: `{op}` called in state {state:?}")
            }
            Self::Surface(e) => write!(f, "surface failure during geom operation: {e}"),
        }
    }
}

impl From<SurfaceError> for GeomError {
    fn from(value: SurfaceError) -> Self {
        Self::Surface(value)
    }
}

/// A typed configurator argument for [`Geom::configure`].
#[derive(Clone, Debug, PartialEq)]
pub enum Setting {
    /// Binds a data field to an encoding position (`x`, `y`, ...).
    Field(String),
    /// A numeric style value (`size`, ...).
    Number(f64),
    /// A textual style value.
    Text(String),
    /// A paint color.
    Color(Color),
}

impl From<&str> for Setting {
    fn from(value: &str) -> Self {
        Self::Field(String::from(value))
    }
}

impl From<String> for Setting {
    fn from(value: String) -> Self {
        Self::Field(value)
    }
}

impl From<f64> for Setting {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Color> for Setting {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

/// The pluggable visual-mark contract consumed by the view.
///
/// Implementations draw exclusively into the group the view hands them, so the view can
/// wipe or release one geom's marks without disturbing siblings.
pub trait Geom {
    /// Returns the mark-kind identifier this geom was registered under.
    fn kind(&self) -> &str;

    /// Returns the current lifecycle state.
    fn state(&self) -> GeomState;

    /// Installs the shared data handle. Does not render.
    fn set_data(&mut self, data: Rc<DataSet>);

    /// Consumes the installed data and resolves this geom's scales through the pool.
    ///
    /// Demand-driven scale resolution here is what guarantees every scale exists before
    /// any mark consumes it. Idempotent when called again with the same data.
    fn init(&mut self, scales: &mut ScalePool) -> Result<(), GeomError>;

    /// Installs the coordinate transform for the current render pass.
    fn set_coord(&mut self, coord: Coord);

    /// Draws into the owned group. May be called repeatedly.
    fn paint(&mut self, surface: &mut dyn Surface, group: GroupId) -> Result<(), GeomError>;

    /// Removes drawn shapes, retaining initialized state.
    fn clear(&mut self, surface: &mut dyn Surface, group: GroupId);

    /// Releases all resources. Terminal.
    fn destroy(&mut self);

    /// Applies one configuration setting.
    ///
    /// Returns `false` when the key is not part of this geom's configurator table; the
    /// caller records a diagnostic in that case instead of failing.
    fn configure(&mut self, key: &str, setting: &Setting) -> bool;
}

impl fmt::Debug for dyn Geom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Geom")
            .field("kind", &self.kind())
            .field("state", &self.state())
            .finish()
    }
}

/// A registry of mark-type factories, injected into the view at construction.
///
/// This replaces ambient global registration: every view sees exactly the kinds its
/// registry carries, and unknown kinds are explicit, checked outcomes.
#[derive(Default)]
pub struct GeomRegistry {
    factories: hashbrown::HashMap<String, Box<dyn Fn() -> Box<dyn Geom>>>,
}

impl GeomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under a mark-kind identifier, replacing any previous one.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        factory: impl Fn() -> Box<dyn Geom> + 'static,
    ) {
        self.factories.insert(kind.into(), Box::new(factory));
    }

    /// Builder-style [`GeomRegistry::register`].
    pub fn with(
        mut self,
        kind: impl Into<String>,
        factory: impl Fn() -> Box<dyn Geom> + 'static,
    ) -> Self {
        self.register(kind, factory);
        self
    }

    /// Returns `true` when `kind` is registered.
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Creates a fresh geom of `kind`, if registered.
    pub fn create(&self, kind: &str) -> Option<Box<dyn Geom>> {
        self.factories.get(kind).map(|f| f())
    }

    /// Iterates the registered kind identifiers.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl fmt::Debug for GeomRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeomRegistry")
            .field("kinds", &self.factories.len())
            .finish()
    }
}
