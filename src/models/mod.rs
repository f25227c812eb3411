//! Data models for keyboard layouts, key geometry and modifiers.
//!
//! This module contains the value types fed in by layout loaders and read by
//! renderers. Models are independent of tree storage and event handling.

pub mod color;
pub mod element;
pub mod geometry;
pub mod keysym_matrix;
pub mod modifier;

// Re-export all model types
pub use color::Color;
pub use element::{Element, ElementId, ElementKind, KeyData, KeyboardData, Orientation, SectionData};
pub use geometry::{Angle, Bounds, Outline, Point};
pub use keysym_matrix::{GroupPolicy, KeysymMatrix, NO_SYMBOL};
pub use modifier::{Modifier, ModifierBehavior, ModifierConfig, ModifierEffect, ModifierSpec, ModifierState};
