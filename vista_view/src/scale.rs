// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-field scales and the controller that derives them.
//!
//! A [`Scale`] maps raw field values into the normalized `[0, 1]` domain the coordinate
//! transform consumes. Scales are value objects: immutable once constructed for a given
//! data snapshot, and recomputed (never mutated) when the data set changes.
//!
//! The [`ScaleController`] holds the declarative per-field definitions and derives a
//! scale from a definition plus sampled data; it is pure with respect to its inputs.
//! The [`ScalePool`] is the view-owned memoization layer on top of it.

extern crate alloc;

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use hashbrown::HashMap;
use vista_core::{DataSet, FieldValue};

use crate::diagnostic::Diagnostic;

/// Default tick count for continuous scales when a definition does not set one.
const DEFAULT_TICK_COUNT: usize = 5;

/// The kind of scale to derive for a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleKind {
    /// Continuous linear scale over numeric values.
    Linear,
    /// Discrete scale over category labels.
    Ordinal,
}

/// A declarative per-field scale definition (override).
///
/// Every option is optional; unset options fall back to data inference. Definitions are
/// merged into the view's options tree via `View::scale` and consumed by the controller
/// on the next scale derivation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScaleDef {
    /// Forces the scale kind instead of inferring it from the data.
    pub kind: Option<ScaleKind>,
    /// Overrides the inferred domain minimum (linear scales).
    pub min: Option<f64>,
    /// Overrides the inferred domain maximum (linear scales).
    pub max: Option<f64>,
    /// Whether to widen the domain to "nice" tick boundaries (linear scales).
    pub nice: bool,
    /// Tick count hint for tick generation (linear scales).
    pub tick_count: Option<usize>,
    /// Explicit category values in display order (ordinal scales).
    pub values: Option<Vec<String>>,
}

impl ScaleDef {
    /// Creates an empty definition (fully data-inferred).
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces a linear scale.
    pub fn linear() -> Self {
        Self {
            kind: Some(ScaleKind::Linear),
            ..Self::default()
        }
    }

    /// Forces an ordinal scale.
    pub fn ordinal() -> Self {
        Self {
            kind: Some(ScaleKind::Ordinal),
            ..Self::default()
        }
    }

    /// Sets the domain minimum.
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the domain maximum.
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Enables or disables nice-domain widening.
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    /// Sets the tick count hint.
    pub fn with_tick_count(mut self, count: usize) -> Self {
        self.tick_count = Some(count);
        self
    }

    /// Sets explicit ordinal categories, forcing an ordinal scale.
    pub fn with_values<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.kind = Some(ScaleKind::Ordinal);
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

/// A continuous linear scale over a numeric domain.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearScale {
    field: String,
    domain: (f64, f64),
    tick_count: usize,
}

impl LinearScale {
    /// Creates a linear scale for `field` over `domain`.
    pub fn new(field: impl Into<String>, domain: (f64, f64)) -> Self {
        Self {
            field: field.into(),
            domain,
            tick_count: DEFAULT_TICK_COUNT,
        }
    }

    /// Sets the tick count hint.
    pub fn with_tick_count(mut self, count: usize) -> Self {
        self.tick_count = count;
        self
    }

    /// Returns the field this scale encodes.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the domain as `(min, max)`.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Maps a raw value into `[0, 1]`. Values outside the domain extrapolate.
    pub fn map_number(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let denom = d1 - d0;
        if denom == 0.0 {
            return 0.0;
        }
        (v - d0) / denom
    }

    /// Returns "nice-ish" tick values for the domain.
    pub fn ticks(&self) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, self.tick_count)
    }
}

/// A discrete scale over category labels.
///
/// Category `i` of `n` maps to `i / (n - 1)`; a single category sits at the midpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct OrdinalScale {
    field: String,
    values: Vec<String>,
}

impl OrdinalScale {
    /// Creates an ordinal scale for `field` over `values` in display order.
    pub fn new(field: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            field: field.into(),
            values,
        }
    }

    /// Returns the field this scale encodes.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the category labels in display order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns the index of a label, if present.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.values.iter().position(|v| v == label)
    }

    /// Returns the normalized position of the category at `index`.
    pub fn position(&self, index: usize) -> f64 {
        let n = self.values.len();
        if n <= 1 {
            return 0.5;
        }
        #[allow(
            clippy::cast_precision_loss,
            reason = "category counts are far below the f64 integer range"
        )]
        {
            index as f64 / (n - 1) as f64
        }
    }
}

/// A per-field scale instance.
#[derive(Clone, Debug, PartialEq)]
pub enum Scale {
    /// Continuous linear scale.
    Linear(LinearScale),
    /// Discrete ordinal scale.
    Ordinal(OrdinalScale),
}

impl Scale {
    /// Returns the field this scale encodes.
    pub fn field(&self) -> &str {
        match self {
            Self::Linear(s) => s.field(),
            Self::Ordinal(s) => s.field(),
        }
    }

    /// Maps a raw field value into `[0, 1]`.
    ///
    /// Returns `None` when the value cannot be positioned on this scale (null values,
    /// labels outside the ordinal domain, non-numeric values on a linear scale).
    pub fn map(&self, value: &FieldValue) -> Option<f64> {
        match self {
            Self::Linear(s) => {
                let v = value.as_f64()?;
                v.is_finite().then(|| s.map_number(v))
            }
            Self::Ordinal(s) => {
                let label = value.label()?;
                s.index_of(&label).map(|i| s.position(i))
            }
        }
    }

    /// Returns the linear domain, if this is a linear scale.
    pub fn linear_domain(&self) -> Option<(f64, f64)> {
        match self {
            Self::Linear(s) => Some(s.domain()),
            Self::Ordinal(_) => None,
        }
    }

    /// Returns the number of ordinal categories, if this is an ordinal scale.
    pub fn category_count(&self) -> Option<usize> {
        match self {
            Self::Linear(_) => None,
            Self::Ordinal(s) => Some(s.values().len()),
        }
    }
}

/// Derives per-field scales from declarative definitions and sampled data.
///
/// Constructed with a field-to-definition map; `create_scale` is pure given that map and
/// the data snapshot.
#[derive(Clone, Debug, Default)]
pub struct ScaleController {
    defs: HashMap<String, ScaleDef>,
}

impl ScaleController {
    /// Creates a controller seeded with per-field definitions.
    pub fn new(defs: HashMap<String, ScaleDef>) -> Self {
        Self { defs }
    }

    /// Returns the definition for a field, if declared.
    pub fn def(&self, field: &str) -> Option<&ScaleDef> {
        self.defs.get(field)
    }

    /// Inserts or replaces the definition for one field.
    pub fn set_def(&mut self, field: impl Into<String>, def: ScaleDef) {
        self.defs.insert(field.into(), def);
    }

    /// Shallow-merges a definition map over the current one.
    pub fn merge_defs(&mut self, defs: HashMap<String, ScaleDef>) {
        self.defs.extend(defs);
    }

    /// Replaces the whole definition map (options re-seed).
    pub fn set_defs(&mut self, defs: HashMap<String, ScaleDef>) {
        self.defs = defs;
    }

    /// Derives a scale for `field` from its definition (if any) and the data sample.
    pub fn create_scale(&self, field: &str, data: &DataSet) -> Scale {
        let def = self.defs.get(field);
        let kind = def
            .and_then(|d| d.kind)
            .unwrap_or_else(|| infer_kind(field, data));
        match kind {
            ScaleKind::Linear => Scale::Linear(self.linear_scale(field, def, data)),
            ScaleKind::Ordinal => Scale::Ordinal(ordinal_scale(field, def, data)),
        }
    }

    fn linear_scale(&self, field: &str, def: Option<&ScaleDef>, data: &DataSet) -> LinearScale {
        let inferred = infer_domain(field, data).unwrap_or((0.0, 1.0));
        let mut min = def.and_then(|d| d.min).unwrap_or(inferred.0);
        let mut max = def.and_then(|d| d.max).unwrap_or(inferred.1);
        if min > max {
            core::mem::swap(&mut min, &mut max);
        }
        if min == max {
            // Widen degenerate domains deterministically so mapping stays defined.
            if min > 0.0 {
                min = 0.0;
            } else if min < 0.0 {
                max = 0.0;
            } else {
                max = 1.0;
            }
        }
        let tick_count = def.and_then(|d| d.tick_count).unwrap_or(DEFAULT_TICK_COUNT);
        if def.is_some_and(|d| d.nice) {
            let ticks = nice_ticks(min, max, tick_count);
            if ticks.len() >= 2 {
                min = *ticks.first().unwrap();
                max = *ticks.last().unwrap();
            }
        }
        LinearScale::new(field, (min, max)).with_tick_count(tick_count)
    }
}

fn infer_kind(field: &str, data: &DataSet) -> ScaleKind {
    for value in data.values(field) {
        match value {
            FieldValue::Number(_) => return ScaleKind::Linear,
            FieldValue::Text(_) | FieldValue::Bool(_) => return ScaleKind::Ordinal,
            FieldValue::Null => continue,
        }
    }
    ScaleKind::Linear
}

fn ordinal_scale(field: &str, def: Option<&ScaleDef>, data: &DataSet) -> OrdinalScale {
    if let Some(values) = def.and_then(|d| d.values.clone()) {
        return OrdinalScale::new(field, values);
    }
    let mut values: Vec<String> = Vec::new();
    for value in data.values(field) {
        let Some(label) = value.label() else { continue };
        if !values.iter().any(|v| *v == *label) {
            values.push(label.into_owned());
        }
    }
    OrdinalScale::new(field, values)
}

/// Infers a `(min, max)` domain for a numeric field.
///
/// Non-finite and non-numeric values are ignored. Returns `None` if no finite numeric
/// value is present.
pub fn infer_domain(field: &str, data: &DataSet) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in data.values(field) {
        let Some(v) = value.as_f64() else { continue };
        if !v.is_finite() {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
    }
    (min.is_finite() && max.is_finite()).then_some((min, max))
}

/// Returns "nice-ish" tick values covering `[min, max]`.
pub fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let span = max - min;
    #[allow(
        clippy::cast_precision_loss,
        reason = "tick counts are tiny relative to the f64 integer range"
    )]
    let step0 = span / count.max(1) as f64;
    let step = nice_step(step0);
    if step == 0.0 {
        return alloc::vec![min, max];
    }

    let start = (min / step).floor() * step;
    let stop = (max / step).ceil() * step;

    let n_f = ((stop - start) / step).round();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        let n_f = n_f.min(10_000.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f as u64
        }
    } else {
        0
    };
    #[allow(
        clippy::cast_precision_loss,
        reason = "tick indices are capped at 10k"
    )]
    (0..=n).map(|i| start + step * i as f64).collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// The view-owned scale cache.
///
/// Wraps the controller and the current data handle; `scale` memoizes per field so scale
/// identity is stable for the lifetime of one data set. A data change invalidates the
/// whole cache (cleared, never merged).
#[derive(Debug, Default)]
pub struct ScalePool {
    controller: ScaleController,
    data: Rc<DataSet>,
    cache: HashMap<String, Rc<Scale>>,
    diagnostics: Vec<Diagnostic>,
}

impl ScalePool {
    /// Creates a pool over a controller and a data handle.
    pub fn new(controller: ScaleController, data: Rc<DataSet>) -> Self {
        Self {
            controller,
            data,
            cache: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Returns the memoized scale for `field`, deriving and caching it on first use.
    ///
    /// A field absent from every record yields a default unit scale and records a
    /// [`Diagnostic::MissingField`].
    pub fn scale(&mut self, field: &str) -> Rc<Scale> {
        if let Some(scale) = self.cache.get(field) {
            return scale.clone();
        }
        if self.data.values(field).next().is_none()
            && self.controller.def(field).is_none_or(|d| d.values.is_none())
        {
            self.diagnostics
                .push(Diagnostic::MissingField(String::from(field)));
        }
        let scale = Rc::new(self.controller.create_scale(field, &self.data));
        self.cache.insert(String::from(field), scale.clone());
        scale
    }

    /// Returns the current data handle.
    pub fn data(&self) -> &Rc<DataSet> {
        &self.data
    }

    /// Replaces the data handle without touching the cache.
    pub fn set_data(&mut self, data: Rc<DataSet>) {
        self.data = data;
    }

    /// Empties the cache. Later `scale` calls derive fresh instances.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    /// Returns the controller.
    pub fn controller(&self) -> &ScaleController {
        &self.controller
    }

    /// Returns the controller for definition re-seeding.
    pub fn controller_mut(&mut self) -> &mut ScaleController {
        &mut self.controller
    }

    /// Replaces the controller wholesale (fresh construction from options).
    pub fn replace_controller(&mut self, controller: ScaleController) {
        self.controller = controller;
    }

    /// Returns `true` when a scale for `field` is cached.
    pub fn has_scale(&self, field: &str) -> bool {
        self.cache.contains_key(field)
    }

    /// Returns the number of cached scales.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Drains pending diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        core::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use vista_core::Record;

    use super::*;

    fn sample() -> DataSet {
        [
            Record::new().with("a", 2.0).with("kind", "east"),
            Record::new().with("a", 8.0).with("kind", "west"),
            Record::new().with("a", 5.0).with("kind", "east"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn numeric_fields_infer_linear_scales() {
        let controller = ScaleController::default();
        let scale = controller.create_scale("a", &sample());
        assert_eq!(scale.linear_domain(), Some((2.0, 8.0)));
        assert_eq!(scale.map(&FieldValue::Number(5.0)), Some(0.5));
        assert_eq!(scale.map(&FieldValue::Null), None);
    }

    #[test]
    fn text_fields_infer_ordinal_scales_in_first_seen_order() {
        let controller = ScaleController::default();
        let scale = controller.create_scale("kind", &sample());
        assert_eq!(scale.category_count(), Some(2));
        assert_eq!(scale.map(&FieldValue::from("east")), Some(0.0));
        assert_eq!(scale.map(&FieldValue::from("west")), Some(1.0));
        assert_eq!(scale.map(&FieldValue::from("north")), None);
    }

    #[test]
    fn def_overrides_take_precedence_over_inference() {
        let mut defs = HashMap::new();
        defs.insert(
            String::from("a"),
            ScaleDef::new().with_min(0.0).with_max(10.0),
        );
        let controller = ScaleController::new(defs);
        let scale = controller.create_scale("a", &sample());
        assert_eq!(scale.linear_domain(), Some((0.0, 10.0)));
        assert_eq!(scale.map(&FieldValue::Number(5.0)), Some(0.5));
    }

    #[test]
    fn nice_widens_the_domain_to_tick_boundaries() {
        let mut defs = HashMap::new();
        defs.insert(String::from("a"), ScaleDef::new().with_nice(true));
        let controller = ScaleController::new(defs);
        let scale = controller.create_scale("a", &sample());
        let (min, max) = scale.linear_domain().unwrap();
        assert!(min <= 2.0);
        assert!(max >= 8.0);
        assert_eq!(min, (min / 2.0).floor() * 2.0);
    }

    #[test]
    fn degenerate_domains_are_widened() {
        let data: DataSet = [Record::new().with("a", 4.0), Record::new().with("a", 4.0)]
            .into_iter()
            .collect();
        let controller = ScaleController::default();
        let scale = controller.create_scale("a", &data);
        assert_eq!(scale.linear_domain(), Some((0.0, 4.0)));
    }

    #[test]
    fn single_category_sits_at_the_midpoint() {
        let scale = OrdinalScale::new("kind", alloc::vec![String::from("only")]);
        assert_eq!(scale.position(0), 0.5);
    }

    #[test]
    fn pool_memoizes_until_invalidated() {
        let mut pool = ScalePool::new(ScaleController::default(), Rc::new(sample()));
        let first = pool.scale("a");
        let again = pool.scale("a");
        assert!(Rc::ptr_eq(&first, &again));

        pool.invalidate();
        let fresh = pool.scale("a");
        assert!(!Rc::ptr_eq(&first, &fresh));
    }

    #[test]
    fn pool_reports_missing_fields() {
        let mut pool = ScalePool::new(ScaleController::default(), Rc::new(sample()));
        let scale = pool.scale("nope");
        assert_eq!(scale.linear_domain(), Some((0.0, 1.0)));
        assert_eq!(
            pool.take_diagnostics(),
            alloc::vec![Diagnostic::MissingField(String::from("nope"))]
        );
        assert!(pool.take_diagnostics().is_empty());
    }

    #[test]
    fn explicit_ordinal_values_need_no_data() {
        let mut pool = ScalePool::new(ScaleController::default(), Rc::new(DataSet::new()));
        pool.controller_mut()
            .set_def("kind", ScaleDef::new().with_values(["a", "b", "c"]));
        let scale = pool.scale("kind");
        assert_eq!(scale.category_count(), Some(3));
        assert!(pool.take_diagnostics().is_empty());
    }

    #[test]
    fn nice_ticks_cover_the_span() {
        let ticks = nice_ticks(0.0, 9.7, 5);
        assert!(ticks.len() >= 2);
        assert!(*ticks.first().unwrap() <= 0.0);
        assert!(*ticks.last().unwrap() >= 9.7);
    }
}
