// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart view orchestration core for `vista_core`.
//!
//! This crate is the state machine coordinating the independently-lifecycled chart
//! subsystems:
//! - **Scales** map raw field values into the normalized `[0, 1]` domain, derived per
//!   field by the [`ScaleController`] and memoized per data snapshot.
//! - **Coordinates** map normalized space onto the drawable region, rebuilt per render
//!   by the [`CoordController`].
//! - **Geoms** are pluggable mark units with a strict init/paint/clear/destroy
//!   lifecycle, attached through an injected [`GeomRegistry`].
//! - The [`View`] sequences all of the above: scales exist before geoms consume them,
//!   the coordinate transform exists before any mark is positioned, and stale marks are
//!   wiped before new ones are built on a data change.
//!
//! Concrete mark types live in `vista_geoms`; axis and guide internals are delegated
//! through hooks and out of scope here.

#![no_std]

extern crate alloc;

mod coord;
mod diagnostic;
#[cfg(not(feature = "std"))]
mod float;
mod geom;
mod options;
mod scale;
mod view;

pub use coord::{
    CartesianCoord, Coord, CoordCfg, CoordController, CoordKind, CoordSpec, PolarCoord,
};
pub use diagnostic::Diagnostic;
pub use geom::{Geom, GeomError, GeomRegistry, GeomState, Setting};
pub use options::{GeomOption, ViewOptions};
pub use scale::{
    LinearScale, OrdinalScale, Scale, ScaleController, ScaleDef, ScaleKind, ScalePool,
    infer_domain, nice_ticks,
};
pub use view::{DrawPrep, GeomId, View, ViewConfig, ViewError};
