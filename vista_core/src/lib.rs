// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `vista_core`: record data model and drawing-surface contract for the Vista chart view.
//!
//! This crate provides the two collaborator boundaries the view orchestrator draws on:
//! - a row-oriented data model ([`Record`]/[`DataSet`]/[`FieldValue`]) that scales sample
//!   and geoms consume, and
//! - the container surface contract ([`Surface`]) with scoped sub-groups ([`GroupId`]) so
//!   each mark unit can be wiped independently of its siblings.
//!
//! It intentionally does NOT provide scales, coordinates, or mark lifecycles; those live
//! in `vista_view` and `vista_geoms`. [`Canvas`] is a plain in-memory surface suitable
//! for tests and for backends that replay [`Shape`]s into a renderer.

#![no_std]

extern crate alloc;

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::{BezPath, Point, Rect};
use peniko::Brush;
use smallvec::SmallVec;

/// A single field value inside a [`Record`].
///
/// v1 keeps this deliberately small: numbers drive continuous scales, text and booleans
/// drive ordinal scales, and `Null` marks an absent measurement.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// A numeric value.
    Number(f64),
    /// A textual (categorical) value.
    Text(String),
    /// A boolean value, treated as a two-category ordinal.
    Bool(bool),
    /// An absent value.
    Null,
}

impl FieldValue {
    /// Returns the numeric content, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a categorical label for ordinal scales, if this value has one.
    pub fn label(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(s) => Some(Cow::Borrowed(s)),
            Self::Bool(true) => Some(Cow::Borrowed("true")),
            Self::Bool(false) => Some(Cow::Borrowed("false")),
            _ => None,
        }
    }

    /// Returns `true` for [`FieldValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        #[allow(
            clippy::cast_precision_loss,
            reason = "chart data rarely exceeds the f64 integer range"
        )]
        Self::Number(value as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(String::from(value))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// One data row: a field-name to value mapping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, FieldValue>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Sets a field value, replacing any previous value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Builder-style [`Record::set`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    /// Returns the value for `field`, if present.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// An ordered sequence of [`Record`]s.
///
/// Row order is meaningful: line geoms connect rows in order, and ordinal scales
/// assign category positions in first-seen order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSet {
    records: Vec<Record>,
}

impl DataSet {
    /// Creates an empty data set.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Appends a record.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Returns the records in row order.
    pub fn rows(&self) -> &[Record] {
        &self.records
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates the values of one field across all rows, skipping rows where the
    /// field is absent.
    pub fn values<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldValue> + 'a {
        self.records.iter().filter_map(move |r| r.get(field))
    }
}

impl From<Vec<Record>> for DataSet {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl FromIterator<Record> for DataSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Stable identifier for a drawable sub-group on a [`Surface`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u32);

/// An evaluated drawable payload.
///
/// This is the render-facing data model: geoms produce `Shape`s into their own group,
/// and downstream backends replay them (SVG, GPU scene, ...).
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// An axis-aligned filled rectangle.
    Rect {
        /// Rectangle geometry in surface coordinates.
        rect: Rect,
        /// Fill paint.
        fill: Brush,
    },
    /// A filled circle.
    Circle {
        /// Center in surface coordinates.
        center: Point,
        /// Radius in surface coordinates.
        radius: f64,
        /// Fill paint.
        fill: Brush,
    },
    /// A stroked vector path.
    Path {
        /// The path geometry in surface coordinates.
        path: BezPath,
        /// Stroke paint.
        stroke: Brush,
        /// Stroke width in surface coordinates.
        stroke_width: f64,
    },
}

/// Errors reported by [`Surface`] collaborators.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// A group handle does not name a live group.
    UnknownGroup(GroupId),
    /// The surface cannot allocate further groups.
    GroupExhausted,
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGroup(g) => write!(f, "unknown surface group {}", g.0),
            Self::GroupExhausted => f.write_str("surface cannot allocate more groups"),
        }
    }
}

/// The container collaborator the view draws through.
///
/// The view never pushes shapes itself; it allocates one group per attached geom and
/// each geom confines its shapes to that group. Wiping or releasing a group must never
/// disturb sibling groups.
pub trait Surface {
    /// Allocates a new empty sub-group.
    fn add_group(&mut self) -> Result<GroupId, SurfaceError>;

    /// Appends a shape to a group.
    fn push(&mut self, group: GroupId, shape: Shape) -> Result<(), SurfaceError>;

    /// Removes all shapes from a group, keeping the group alive. Unknown groups are
    /// ignored.
    fn clear_group(&mut self, group: GroupId);

    /// Releases a group and its shapes. The handle is dead afterwards.
    fn release_group(&mut self, group: GroupId);

    /// Removes all drawn content and all groups.
    fn clear(&mut self);
}

/// A plain in-memory [`Surface`].
///
/// Groups are kept in allocation order so replaying [`Canvas::shapes`] preserves the
/// view's paint order. An optional group budget makes allocation failure testable.
#[derive(Debug, Default)]
pub struct Canvas {
    groups: Vec<Option<Vec<Shape>>>,
    released: SmallVec<[u32; 4]>,
    group_budget: Option<usize>,
}

impl Canvas {
    /// Creates an empty canvas with no group budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a canvas that refuses to allocate more than `budget` live groups.
    pub fn with_group_budget(budget: usize) -> Self {
        Self {
            groups: Vec::new(),
            released: SmallVec::new(),
            group_budget: Some(budget),
        }
    }

    fn live_groups(&self) -> usize {
        self.groups.iter().filter(|g| g.is_some()).count()
    }

    /// Returns the shapes of one group, if the group is alive.
    pub fn shapes_in(&self, group: GroupId) -> Option<&[Shape]> {
        self.groups
            .get(group.0 as usize)
            .and_then(|g| g.as_deref())
    }

    /// Iterates all shapes across live groups in group allocation order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.groups.iter().flatten().flatten()
    }

    /// Returns the total number of drawn shapes.
    pub fn shape_count(&self) -> usize {
        self.shapes().count()
    }

    /// Returns `true` when no shapes are drawn anywhere.
    pub fn is_blank(&self) -> bool {
        self.shapes().next().is_none()
    }
}

impl Surface for Canvas {
    fn add_group(&mut self) -> Result<GroupId, SurfaceError> {
        if let Some(budget) = self.group_budget
            && self.live_groups() >= budget
        {
            return Err(SurfaceError::GroupExhausted);
        }
        // Recycled slots keep ids dense; paint order still follows the view's geom order
        // because geoms replay into their group every render.
        if let Some(slot) = self.released.pop() {
            self.groups[slot as usize] = Some(Vec::new());
            return Ok(GroupId(slot));
        }
        let id = u32::try_from(self.groups.len()).map_err(|_| SurfaceError::GroupExhausted)?;
        self.groups.push(Some(Vec::new()));
        Ok(GroupId(id))
    }

    fn push(&mut self, group: GroupId, shape: Shape) -> Result<(), SurfaceError> {
        let slot = self
            .groups
            .get_mut(group.0 as usize)
            .and_then(|g| g.as_mut())
            .ok_or(SurfaceError::UnknownGroup(group))?;
        slot.push(shape);
        Ok(())
    }

    fn clear_group(&mut self, group: GroupId) {
        if let Some(Some(slot)) = self.groups.get_mut(group.0 as usize) {
            slot.clear();
        }
    }

    fn release_group(&mut self, group: GroupId) {
        if let Some(slot) = self.groups.get_mut(group.0 as usize)
            && slot.is_some()
        {
            *slot = None;
            self.released.push(group.0);
        }
    }

    fn clear(&mut self) {
        self.groups.clear();
        self.released.clear();
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn rect_shape() -> Shape {
        Shape::Rect {
            rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            fill: Brush::default(),
        }
    }

    #[test]
    fn groups_are_isolated() {
        let mut canvas = Canvas::new();
        let a = canvas.add_group().unwrap();
        let b = canvas.add_group().unwrap();
        canvas.push(a, rect_shape()).unwrap();
        canvas.push(b, rect_shape()).unwrap();
        canvas.push(b, rect_shape()).unwrap();

        canvas.clear_group(b);
        assert_eq!(canvas.shapes_in(a).unwrap().len(), 1);
        assert_eq!(canvas.shapes_in(b).unwrap().len(), 0);
    }

    #[test]
    fn released_groups_reject_pushes() {
        let mut canvas = Canvas::new();
        let g = canvas.add_group().unwrap();
        canvas.release_group(g);
        assert_eq!(
            canvas.push(g, rect_shape()),
            Err(SurfaceError::UnknownGroup(g))
        );
        assert!(canvas.shapes_in(g).is_none());
    }

    #[test]
    fn group_budget_is_enforced_on_live_groups() {
        let mut canvas = Canvas::with_group_budget(1);
        let g = canvas.add_group().unwrap();
        assert_eq!(canvas.add_group(), Err(SurfaceError::GroupExhausted));
        canvas.release_group(g);
        assert!(canvas.add_group().is_ok());
    }

    #[test]
    fn clear_removes_everything() {
        let mut canvas = Canvas::new();
        let g = canvas.add_group().unwrap();
        canvas.push(g, rect_shape()).unwrap();
        canvas.clear();
        assert!(canvas.is_blank());
        assert!(canvas.shapes_in(g).is_none());
    }

    #[test]
    fn dataset_field_sampling_skips_absent_fields() {
        let data: DataSet = [
            Record::new().with("a", 1.0).with("b", "x"),
            Record::new().with("a", 2.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(data.values("a").count(), 2);
        assert_eq!(data.values("b").count(), 1);
        assert_eq!(data.values("missing").count(), 0);
    }

    #[test]
    fn field_value_labels() {
        assert_eq!(FieldValue::from("east").label().unwrap(), "east");
        assert_eq!(FieldValue::from(true).label().unwrap(), "true");
        assert!(FieldValue::from(3.0).label().is_none());
        assert_eq!(FieldValue::from(3.0).as_f64(), Some(3.0));
        assert!(FieldValue::Null.is_null());
    }
}
