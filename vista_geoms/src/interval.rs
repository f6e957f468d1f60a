// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interval (bar) mark.

extern crate alloc;

use alloc::rc::Rc;

use kurbo::{Point, Rect};
use peniko::Color;
use vista_core::{DataSet, FieldValue, GroupId, Shape, Surface};
use vista_view::{Coord, Geom, GeomError, GeomState, ScalePool, Setting};

use crate::series::SeriesBase;

/// Fraction of one category slot a bar occupies.
const DEFAULT_BAND_RATIO: f64 = 0.5;
const DEFAULT_COLOR: Color = Color::from_rgb8(0xfa, 0x8c, 0x16);

/// Draws one filled bar per mappable row, from the value baseline to the row's value.
///
/// The baseline is data zero when the y domain contains it, clamped to the nearer
/// domain edge otherwise. Bar width divides the normalized x axis evenly across the
/// ordinal categories (or the row count on a continuous x).
#[derive(Debug)]
pub struct IntervalGeom {
    base: SeriesBase,
    band_ratio: f64,
}

impl IntervalGeom {
    /// Creates an interval geom with the default band ratio and color.
    pub fn new() -> Self {
        Self {
            base: SeriesBase::new(DEFAULT_COLOR),
            band_ratio: DEFAULT_BAND_RATIO,
        }
    }

    /// Normalized half-width of one bar.
    fn half_band(&self) -> f64 {
        let slots = self
            .base
            .x_scale()
            .and_then(|s| s.category_count())
            .unwrap_or_else(|| self.base.row_count())
            .max(1);
        #[allow(
            clippy::cast_precision_loss,
            reason = "slot counts are far below the f64 integer range"
        )]
        {
            self.band_ratio / slots as f64 / 2.0
        }
    }

    /// Normalized position of the value baseline.
    fn baseline(&self) -> f64 {
        self.base
            .y_scale()
            .and_then(|s| s.map(&FieldValue::Number(0.0)))
            .map_or(0.0, |v| v.clamp(0.0, 1.0))
    }
}

impl Default for IntervalGeom {
    fn default() -> Self {
        Self::new()
    }
}

impl Geom for IntervalGeom {
    fn kind(&self) -> &str {
        "interval"
    }

    fn state(&self) -> GeomState {
        self.base.state()
    }

    fn set_data(&mut self, data: Rc<DataSet>) {
        self.base.set_data(data);
    }

    fn init(&mut self, scales: &mut ScalePool) -> Result<(), GeomError> {
        self.base.init(scales)
    }

    fn set_coord(&mut self, coord: Coord) {
        self.base.set_coord(coord);
    }

    fn paint(&mut self, surface: &mut dyn Surface, group: GroupId) -> Result<(), GeomError> {
        let coord = self.base.require_paintable()?;
        surface.clear_group(group);
        let half = self.half_band();
        let baseline = self.baseline();
        for p in self.base.normalized() {
            let near = coord.map(Point::new(p.x - half, baseline));
            let far = coord.map(Point::new(p.x + half, p.y));
            surface.push(
                group,
                Shape::Rect {
                    rect: Rect::from_points(near, far),
                    fill: self.base.color(),
                },
            )?;
        }
        self.base.mark_painted();
        Ok(())
    }

    fn clear(&mut self, surface: &mut dyn Surface, group: GroupId) {
        surface.clear_group(group);
        self.base.clear();
    }

    fn destroy(&mut self) {
        self.base.destroy();
    }

    fn configure(&mut self, key: &str, setting: &Setting) -> bool {
        match (key, setting) {
            ("band", Setting::Number(ratio)) if *ratio > 0.0 && *ratio <= 1.0 => {
                self.band_ratio = *ratio;
                true
            }
            _ => self.base.configure(key, setting),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn band_ratio_rejects_out_of_range_values() {
        let mut geom = IntervalGeom::new();
        assert!(geom.configure("band", &Setting::from(0.8)));
        assert_eq!(geom.band_ratio, 0.8);
        assert!(!geom.configure("band", &Setting::from(0.0)));
        assert!(!geom.configure("band", &Setting::from(1.5)));
        assert_eq!(geom.band_ratio, 0.8);
    }
}
