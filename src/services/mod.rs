//! Service layer for business logic.
//!
//! The layout tree owns the elements, the modifier tracker owns the latch and
//! lock state, and the session ties both to key events.

pub mod modifiers;
pub mod session;
pub mod tree;

// Re-export commonly used types
pub use modifiers::{LookupIndex, ModifierTracker, ModifierTransition};
pub use session::{KeyPress, LayoutSession};
pub use tree::{LayoutTree, NodeId};
