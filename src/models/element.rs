//! Layout elements: keys, sections, containers and the keyboard root.
//!
//! An [`Element`] carries what every node has (id, bounds, rotation) and an
//! [`ElementKind`] payload for what is specific to keys and containers. The
//! tree structure itself lives in [`crate::services::tree::LayoutTree`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::{Angle, Bounds, Color, GroupPolicy, KeysymMatrix, Modifier, ModifierConfig, Outline};

/// Identity of an element, assigned by whoever builds the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ElementId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Orientation of rows in sections. Elements in a row are arranged along it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Elements are stacked top to bottom
    Vertical,
    /// Elements are placed left to right
    #[default]
    Horizontal,
}

/// A key: its symbols, shape and optional modifier role.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyData {
    /// Hardware keycode emitted for this key
    pub keycode: u32,
    /// All symbols the key can produce
    pub symbols: KeysymMatrix,
    /// Precise shape, shared between keys of the same shape
    pub outline: Option<Arc<Outline>>,
    /// Set when the key acts as a modifier instead of producing text
    pub modifier: Option<Modifier>,
    /// Fill color hint for renderers
    pub fill: Option<Arc<Color>>,
}

impl KeyData {
    /// Creates a plain (non-modifier) key.
    #[must_use]
    pub const fn new(keycode: u32, symbols: KeysymMatrix) -> Self {
        Self {
            keycode,
            symbols,
            outline: None,
            modifier: None,
            fill: None,
        }
    }

    /// Sets the key outline.
    pub fn with_outline(mut self, outline: Arc<Outline>) -> Self {
        self.outline = Some(outline);
        self
    }

    /// Marks the key as a modifier key.
    pub const fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    /// Sets the fill color.
    pub fn with_fill(mut self, fill: Arc<Color>) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Symbol at a resolved group and level (see [`KeysymMatrix::lookup`]).
    pub fn symbol(&self, group: usize, level: usize) -> crate::Result<u32> {
        self.symbols.lookup(group, level)
    }
}

/// A section: rows of keys sharing one orientation and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectionData {
    /// Direction of each row
    pub orientation: Orientation,
    /// Number of rows declared for the section
    pub rows: usize,
}

/// The keyboard root: modifier configuration for the whole layout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyboardData {
    /// Per-modifier behavior and effect
    pub modifiers: ModifierConfig,
    /// How lookups treat a group beyond a key's matrix
    pub group_policy: GroupPolicy,
}

/// Kind-specific payload of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Leaf key
    Key(KeyData),
    /// Section of rows
    Section(SectionData),
    /// Generic grouping node (e.g. a row)
    Container(Orientation),
    /// Root of a layout
    Keyboard(KeyboardData),
}

/// Node of a layout tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Identity used by `find_by_id` and key events
    pub id: ElementId,
    /// Optional name from the layout data (e.g. "AC01")
    pub name: Option<String>,
    /// Position in the parent and extent, before rotation
    pub bounds: Bounds,
    /// Rotation about the element's own origin
    pub angle: Angle,
    /// Key or container payload
    pub kind: ElementKind,
}

impl Element {
    fn new(id: impl Into<ElementId>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            name: None,
            bounds: Bounds::default(),
            angle: Angle::ZERO,
            kind,
        }
    }

    /// Creates a key element.
    pub fn key(id: impl Into<ElementId>, key: KeyData) -> Self {
        Self::new(id, ElementKind::Key(key))
    }

    /// Creates a section element.
    pub fn section(id: impl Into<ElementId>, orientation: Orientation) -> Self {
        Self::new(
            id,
            ElementKind::Section(SectionData {
                orientation,
                rows: 0,
            }),
        )
    }

    /// Creates a generic container element.
    pub fn container(id: impl Into<ElementId>, orientation: Orientation) -> Self {
        Self::new(id, ElementKind::Container(orientation))
    }

    /// Creates a keyboard root element.
    pub fn keyboard(id: impl Into<ElementId>, modifiers: ModifierConfig) -> Self {
        Self::new(
            id,
            ElementKind::Keyboard(KeyboardData {
                modifiers,
                group_policy: GroupPolicy::default(),
            }),
        )
    }

    /// Sets the bounds.
    pub const fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets the rotation.
    pub const fn with_angle(mut self, angle: Angle) -> Self {
        self.angle = angle;
        self
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the declared row count. No effect on non-section elements.
    pub fn with_rows(mut self, rows: usize) -> Self {
        if let ElementKind::Section(section) = &mut self.kind {
            section.rows = rows;
        }
        self
    }

    /// Sets the group policy. No effect on non-keyboard elements.
    pub fn with_group_policy(mut self, policy: GroupPolicy) -> Self {
        if let ElementKind::Keyboard(keyboard) = &mut self.kind {
            keyboard.group_policy = policy;
        }
        self
    }

    /// Returns `true` for elements that can hold children.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        !matches!(self.kind, ElementKind::Key(_))
    }

    /// Key payload, if this is a key.
    #[must_use]
    pub const fn as_key(&self) -> Option<&KeyData> {
        match &self.kind {
            ElementKind::Key(key) => Some(key),
            _ => None,
        }
    }

    /// Keyboard payload, if this is a keyboard root.
    #[must_use]
    pub const fn as_keyboard(&self) -> Option<&KeyboardData> {
        match &self.kind {
            ElementKind::Keyboard(keyboard) => Some(keyboard),
            _ => None,
        }
    }

    /// Mutable keyboard payload, if this is a keyboard root.
    pub fn as_keyboard_mut(&mut self) -> Option<&mut KeyboardData> {
        match &mut self.kind {
            ElementKind::Keyboard(keyboard) => Some(keyboard),
            _ => None,
        }
    }

    /// Row orientation of a container; `None` for keys and the keyboard.
    #[must_use]
    pub const fn orientation(&self) -> Option<Orientation> {
        match &self.kind {
            ElementKind::Section(section) => Some(section.orientation),
            ElementKind::Container(orientation) => Some(*orientation),
            ElementKind::Key(_) | ElementKind::Keyboard(_) => None,
        }
    }
}
