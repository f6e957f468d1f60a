// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in mark types for the Vista chart view.
//!
//! Each geom here implements the [`Geom`](vista_view::Geom) lifecycle contract from
//! `vista_view` and draws into the surface group its owning view hands it:
//! - [`PointGeom`] — one circle per row,
//! - [`LineGeom`] — one polyline connecting the rows in order,
//! - [`IntervalGeom`] — one bar per row from the value baseline.
//!
//! [`default_registry`] bundles them under their conventional kind names; views that
//! want a different mark vocabulary build their own registry.

#![no_std]

extern crate alloc;

use alloc::boxed::Box;

use vista_view::GeomRegistry;

mod interval;
mod line;
mod point;
mod series;

pub use interval::IntervalGeom;
pub use line::LineGeom;
pub use point::PointGeom;

/// Builds a registry carrying the built-in mark kinds: `point`, `line`, `interval`.
pub fn default_registry() -> GeomRegistry {
    GeomRegistry::new()
        .with("point", || Box::new(PointGeom::new()))
        .with("line", || Box::new(LineGeom::new()))
        .with("interval", || Box::new(IntervalGeom::new()))
}
