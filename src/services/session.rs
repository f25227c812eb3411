//! Layout session: one keyboard tree plus its modifier state.
//!
//! Key events are processed one at a time through `&mut self`; a host that
//! needs to share a session between threads wraps it in a single mutex.

use tracing::trace;

use crate::error::{KeyboardError, Result};
use crate::models::{
    ElementId, KeyData, KeyboardData, Modifier, ModifierBehavior, ModifierState, NO_SYMBOL,
};
use crate::services::modifiers::{LookupIndex, ModifierTracker, ModifierTransition};
use crate::services::tree::{LayoutTree, NodeId};

/// Outcome of a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    /// Pressed key
    pub element: ElementId,
    /// Hardware keycode of the pressed key
    pub keycode: u32,
    /// Resolved symbol id; `NO_SYMBOL` for a modifier key without a symbol
    /// at the resolved cell
    pub keysym: u32,
    /// Group and level used for the lookup
    pub index: LookupIndex,
    /// State change when the pressed key is a modifier
    pub transition: Option<ModifierTransition>,
    /// Latched modifiers released by this (non-modifier) press
    pub released: Vec<Modifier>,
}

/// A built keyboard and the modifier state of one input session.
#[derive(Debug, Clone)]
pub struct LayoutSession {
    tree: LayoutTree,
    keyboard: NodeId,
    modifiers: ModifierTracker,
}

impl LayoutSession {
    /// Starts a session on a finished tree.
    ///
    /// # Errors
    ///
    /// Returns `NotAKeyboard` if `keyboard` isn't a keyboard root.
    pub fn new(tree: LayoutTree, keyboard: NodeId) -> Result<Self> {
        let element = tree.element(keyboard)?;
        if element.as_keyboard().is_none() {
            return Err(KeyboardError::NotAKeyboard { element: element.id });
        }
        Ok(Self {
            tree,
            keyboard,
            modifiers: ModifierTracker::new(),
        })
    }

    /// The layout tree.
    #[must_use]
    pub const fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    /// Handle of the keyboard root.
    #[must_use]
    pub const fn keyboard(&self) -> NodeId {
        self.keyboard
    }

    /// Current modifier state.
    #[must_use]
    pub const fn modifiers(&self) -> &ModifierTracker {
        &self.modifiers
    }

    /// Keyboard-wide configuration.
    pub fn config(&self) -> Result<&KeyboardData> {
        let element = self.tree.element(self.keyboard)?;
        element
            .as_keyboard()
            .ok_or(KeyboardError::NotAKeyboard { element: element.id })
    }

    /// Changes how a modifier key behaves from now on.
    ///
    /// The modifier's current state is kept; its next press follows the new
    /// behavior.
    pub fn set_modifier_behavior(&mut self, modifier: Modifier, behavior: ModifierBehavior) {
        if let Some(keyboard) = self
            .tree
            .get_mut(self.keyboard)
            .and_then(crate::models::Element::as_keyboard_mut)
        {
            keyboard.modifiers.set_behavior(modifier, behavior);
        }
    }

    /// Current state of a modifier.
    #[must_use]
    pub fn modifier_state(&self, modifier: Modifier) -> ModifierState {
        self.modifiers.state(modifier)
    }

    /// State of the modifier a key acts as. Keys without a modifier role are
    /// always `Inactive`.
    ///
    /// Renderers use this to highlight latched and locked modifier keys.
    pub fn key_state(&self, id: ElementId) -> Result<ModifierState> {
        let key = self.key(self.key_node(id)?)?;
        Ok(key
            .modifier
            .map_or(ModifierState::Inactive, |m| self.modifiers.state(m)))
    }

    /// Returns `true` if the key's modifier is locked.
    pub fn is_key_locked(&self, id: ElementId) -> Result<bool> {
        Ok(self.key_state(id)? == ModifierState::Locked)
    }

    /// Returns `true` if the key's modifier is latched.
    pub fn is_key_latched(&self, id: ElementId) -> Result<bool> {
        Ok(self.key_state(id)? == ModifierState::Latched)
    }

    /// Clears every latched and locked modifier.
    pub fn reset_modifiers(&mut self) {
        self.modifiers.reset();
    }

    /// Finds a key of this keyboard by element id.
    pub fn key_node(&self, id: ElementId) -> Result<NodeId> {
        self.tree
            .find_by_id(self.keyboard, id)
            .ok_or(KeyboardError::UnknownElement { element: id })
    }

    /// Group and level the active modifiers select for a key.
    pub fn current_index(&self, id: ElementId) -> Result<LookupIndex> {
        let key = self.key(self.key_node(id)?)?;
        let config = self.config()?;
        Ok(self.modifiers.resolve(&config.modifiers).for_matrix(&key.symbols))
    }

    /// Symbol a key would produce right now, without pressing it.
    ///
    /// Renderers use this to label keys for the current modifier state.
    pub fn current_symbol(&self, id: ElementId) -> Result<u32> {
        let index = self.current_index(id)?;
        let key = self.key(self.key_node(id)?)?;
        key.symbols.lookup(index.group, index.level)
    }

    /// Looks up a key's symbol at an explicit group and level, applying the
    /// keyboard's group policy.
    pub fn lookup(&self, id: ElementId, group: usize, level: usize) -> Result<u32> {
        let key = self.key(self.key_node(id)?)?;
        key.symbols.lookup_with(self.config()?.group_policy, group, level)
    }

    /// Presses a key identified by element id.
    ///
    /// The symbol is resolved from the modifier state before the press. Then
    /// a modifier key updates its own state, and any other key releases the
    /// latched modifiers. A modifier key without a symbol still changes
    /// state. A failed lookup on any other key leaves the modifier state
    /// untouched.
    pub fn press(&mut self, id: ElementId) -> Result<KeyPress> {
        let node = self.key_node(id)?;
        self.press_node(node)
    }

    /// Presses the first key carrying `keycode`.
    pub fn press_keycode(&mut self, keycode: u32) -> Result<KeyPress> {
        let node = self
            .tree
            .find_by_keycode(self.keyboard, keycode)
            .ok_or(KeyboardError::UnknownKeycode { keycode })?;
        self.press_node(node)
    }

    fn press_node(&mut self, node: NodeId) -> Result<KeyPress> {
        let element = self.tree.element(node)?.id;
        let key = self.key(node)?;
        let config = self.config()?;

        let index = self.modifiers.resolve(&config.modifiers).for_matrix(&key.symbols);
        let role = key.modifier.map(|m| (m, config.modifiers.behavior(m)));
        // Modifier keys change state even when they carry no symbol
        let keysym = match (key.symbols.lookup(index.group, index.level), role) {
            (Ok(keysym), _) => keysym,
            (Err(_), Some(_)) => NO_SYMBOL,
            (Err(err), None) => return Err(err),
        };
        let keycode = key.keycode;
        trace!(
            %element,
            keycode,
            keysym,
            group = index.group,
            level = index.level,
            "key resolved"
        );

        let (transition, released) = match role {
            Some((modifier, behavior)) => {
                let transition = self.modifiers.press_modifier(modifier, behavior);
                (Some(transition), Vec::new())
            }
            None => (None, self.modifiers.press_other()),
        };

        Ok(KeyPress {
            element,
            keycode,
            keysym,
            index,
            transition,
            released,
        })
    }

    fn key(&self, node: NodeId) -> Result<&KeyData> {
        let element = self.tree.element(node)?;
        element
            .as_key()
            .ok_or(KeyboardError::NotAKey { element: element.id })
    }
}
