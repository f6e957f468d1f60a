// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate transforms from normalized layout space into surface space.
//!
//! A [`Coord`] maps the normalized `[0, 1] × [0, 1]` square onto the drawable region
//! described by two boundary points. It is a value object: the controller rebuilds it on
//! every render (the boundary rectangle may change between renders, e.g. when guide
//! space is reserved), and never mutates one in place.

extern crate alloc;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use kurbo::Point;

/// The coordinate-system family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoordKind {
    /// Rectangular coordinates: normalized x/y lerp across the boundary rectangle.
    #[default]
    Cartesian,
    /// Polar coordinates: normalized x sweeps the angle, normalized y the radius.
    Polar,
}

/// Configuration shared by coordinate kinds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordCfg {
    /// Swaps the roles of the normalized x and y inputs.
    pub transposed: bool,
    /// Polar start angle in radians.
    pub start_angle: f64,
    /// Polar end angle in radians.
    pub end_angle: f64,
    /// Polar inner radius as a fraction of the outer radius, in `[0, 1)`.
    pub inner_radius: f64,
}

impl Default for CoordCfg {
    fn default() -> Self {
        Self {
            transposed: false,
            // Full sweep starting at twelve o'clock.
            start_angle: -core::f64::consts::FRAC_PI_2,
            end_angle: 3.0 * core::f64::consts::FRAC_PI_2,
            inner_radius: 0.0,
        }
    }
}

impl CoordCfg {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps the normalized axes.
    pub fn transposed(mut self) -> Self {
        self.transposed = true;
        self
    }

    /// Sets the polar sweep in radians.
    pub fn with_angles(mut self, start: f64, end: f64) -> Self {
        self.start_angle = start;
        self.end_angle = end;
        self
    }

    /// Sets the polar inner radius fraction.
    pub fn with_inner_radius(mut self, inner: f64) -> Self {
        self.inner_radius = inner.clamp(0.0, 1.0);
        self
    }
}

/// The active coordinate descriptor: a kind plus its configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoordSpec {
    /// The coordinate-system family.
    pub kind: CoordKind,
    /// Kind configuration.
    pub cfg: CoordCfg,
}

impl CoordSpec {
    /// Creates a cartesian descriptor with default configuration.
    pub fn cartesian() -> Self {
        Self::default()
    }

    /// Creates a polar descriptor with default configuration.
    pub fn polar() -> Self {
        Self {
            kind: CoordKind::Polar,
            cfg: CoordCfg::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_cfg(mut self, cfg: CoordCfg) -> Self {
        self.cfg = cfg;
        self
    }
}

/// A rectangular transform over the boundary rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CartesianCoord {
    start: Point,
    end: Point,
    transposed: bool,
}

impl CartesianCoord {
    /// Maps a normalized point into surface space.
    pub fn map(&self, p: Point) -> Point {
        let (nx, ny) = if self.transposed { (p.y, p.x) } else { (p.x, p.y) };
        Point::new(
            self.start.x + nx * (self.end.x - self.start.x),
            self.start.y + ny * (self.end.y - self.start.y),
        )
    }
}

/// A polar transform inscribed in the boundary rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolarCoord {
    center: Point,
    inner_radius: f64,
    outer_radius: f64,
    start_angle: f64,
    end_angle: f64,
    transposed: bool,
}

impl PolarCoord {
    /// Returns the center of the polar system in surface space.
    pub fn center(&self) -> Point {
        self.center
    }

    /// Returns the outer radius in surface units.
    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    /// Maps a normalized point into surface space.
    ///
    /// Normalized x sweeps `[start_angle, end_angle]`, normalized y interpolates between
    /// the inner and outer radius.
    pub fn map(&self, p: Point) -> Point {
        let (nx, ny) = if self.transposed { (p.y, p.x) } else { (p.x, p.y) };
        let angle = self.start_angle + nx * (self.end_angle - self.start_angle);
        let radius = self.inner_radius + ny * (self.outer_radius - self.inner_radius);
        Point::new(
            self.center.x + radius * angle.cos(),
            self.center.y + radius * angle.sin(),
        )
    }
}

/// The coordinate transform active for one render pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Coord {
    /// Rectangular coordinates.
    Cartesian(CartesianCoord),
    /// Polar coordinates.
    Polar(PolarCoord),
}

impl Coord {
    /// Maps a normalized point into surface space.
    pub fn map(&self, p: Point) -> Point {
        match self {
            Self::Cartesian(c) => c.map(p),
            Self::Polar(c) => c.map(p),
        }
    }

    /// Returns the coordinate-system family.
    pub fn kind(&self) -> CoordKind {
        match self {
            Self::Cartesian(_) => CoordKind::Cartesian,
            Self::Polar(_) => CoordKind::Polar,
        }
    }
}

/// Builds coordinate transforms from the active descriptor and boundary points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoordController {
    spec: CoordSpec,
}

impl CoordController {
    /// Creates a controller with an initial descriptor.
    pub fn new(spec: CoordSpec) -> Self {
        Self { spec }
    }

    /// Replaces the active descriptor. Takes effect on the next `create_coord`.
    pub fn reset(&mut self, spec: CoordSpec) {
        self.spec = spec;
    }

    /// Returns the active descriptor.
    pub fn spec(&self) -> &CoordSpec {
        &self.spec
    }

    /// Builds a transform for the region between `start` and `end`.
    ///
    /// Pure given the current descriptor and the two points.
    pub fn create_coord(&self, start: Point, end: Point) -> Coord {
        let cfg = self.spec.cfg;
        match self.spec.kind {
            CoordKind::Cartesian => Coord::Cartesian(CartesianCoord {
                start,
                end,
                transposed: cfg.transposed,
            }),
            CoordKind::Polar => {
                let center = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
                let outer = ((end.x - start.x).abs().min((end.y - start.y).abs())) / 2.0;
                Coord::Polar(PolarCoord {
                    center,
                    inner_radius: cfg.inner_radius * outer,
                    outer_radius: outer,
                    start_angle: cfg.start_angle,
                    end_angle: cfg.end_angle,
                    transposed: cfg.transposed,
                })
            }
        }
    }
}
