//! Error types for layout construction, symbol lookup and key events.

use crate::models::ElementId;

/// Result type used by the layout model and the modifier engine.
pub type Result<T> = std::result::Result<T, KeyboardError>;

/// Which index went out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexAxis {
    /// Group (row) of a keysym matrix
    Group,
    /// Level (column) of a keysym matrix
    Level,
}

impl std::fmt::Display for IndexAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Group => write!(f, "group"),
            Self::Level => write!(f, "level"),
        }
    }
}

/// Failures reported by the keyboard core.
///
/// Every failure is scoped to the call that produced it. The tree and the
/// modifier state are left exactly as they were before the call.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyboardError {
    /// Group or level index beyond the matrix dimensions
    IndexOutOfRange {
        /// Axis that overflowed
        axis: IndexAxis,
        /// Requested index
        index: usize,
        /// Number of entries available on that axis
        len: usize,
    },
    /// Element already has a parent
    DuplicateChild {
        /// Element that was being re-parented
        child: ElementId,
    },
    /// Color channel outside `0.0..=1.0`
    InvalidColorComponent {
        /// Channel name ("red", "green", "blue", "alpha")
        channel: &'static str,
        /// Offending value
        value: f64,
    },
    /// Matrix data length doesn't match `num_groups * num_levels`
    InvalidMatrixShape {
        /// Declared number of groups
        num_groups: usize,
        /// Declared number of levels
        num_levels: usize,
        /// Actual data length
        len: usize,
    },
    /// Children can only be added to sections, containers and keyboards
    NotAContainer {
        /// Element that was used as a parent
        element: ElementId,
    },
    /// Element is the container itself or one of its ancestors
    CyclicInsertion {
        /// Element that was being inserted
        child: ElementId,
    },
    /// Handle or id doesn't name an element of the tree
    UnknownElement {
        /// Requested id
        element: ElementId,
    },
    /// Node handle doesn't belong to this tree
    InvalidHandle,
    /// Element exists but isn't a keyboard root
    NotAKeyboard {
        /// Requested id
        element: ElementId,
    },
    /// Element exists but isn't a key
    NotAKey {
        /// Requested id
        element: ElementId,
    },
    /// No key in the keyboard carries this keycode
    UnknownKeycode {
        /// Requested keycode
        keycode: u32,
    },
}

impl std::fmt::Display for KeyboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { axis, index, len } => {
                write!(f, "Index Out of Range: {axis} {index} (have {len})")
            }
            Self::DuplicateChild { child } => {
                write!(f, "Duplicate Child: element {child} already has a parent")
            }
            Self::InvalidColorComponent { channel, value } => write!(
                f,
                "Invalid Color Component: {channel} = {value} (expected 0.0..=1.0)"
            ),
            Self::InvalidMatrixShape {
                num_groups,
                num_levels,
                len,
            } => write!(
                f,
                "Invalid Matrix Shape: {num_groups} groups x {num_levels} levels needs {} symbols, got {len}",
                num_groups * num_levels
            ),
            Self::NotAContainer { element } => {
                write!(f, "Not a Container: element {element} cannot hold children")
            }
            Self::CyclicInsertion { child } => write!(
                f,
                "Cyclic Insertion: element {child} is an ancestor of the target container"
            ),
            Self::UnknownElement { element } => write!(f, "Unknown Element: {element}"),
            Self::InvalidHandle => write!(f, "Invalid Handle: node is not part of this tree"),
            Self::NotAKeyboard { element } => write!(f, "Not a Keyboard: element {element}"),
            Self::NotAKey { element } => write!(f, "Not a Key: element {element}"),
            Self::UnknownKeycode { keycode } => write!(f, "Unknown Keycode: {keycode}"),
        }
    }
}

impl std::error::Error for KeyboardError {}
