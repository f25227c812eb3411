//! Virtual Keyboard Library
//!
//! This library provides the core of an on-screen keyboard: a layout tree of
//! keyboards, sections and keys with their geometry, the symbol matrix of
//! each key, and the modifier state machine that decides which symbol a key
//! press produces.

// Module declarations
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use config::Config;
pub use error::{IndexAxis, KeyboardError, Result};
pub use models::{
    Angle, Bounds, Color, Element, ElementId, ElementKind, GroupPolicy, KeyData, KeysymMatrix,
    Modifier, ModifierBehavior, ModifierConfig, ModifierEffect, ModifierState, Orientation,
    Outline, Point,
};
pub use services::{KeyPress, LayoutSession, LayoutTree, LookupIndex, ModifierTracker, NodeId};
