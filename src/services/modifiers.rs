//! Modifier state machine.
//!
//! Tracks which modifiers are latched or locked across key presses and
//! resolves the (group, level) cell used to look up a key's symbol.

use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{KeysymMatrix, Modifier, ModifierBehavior, ModifierConfig, ModifierEffect, ModifierState};

/// Group and level selected by the active modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LookupIndex {
    /// Group (symbol set)
    pub group: usize,
    /// Level within the group
    pub level: usize,
}

impl LookupIndex {
    /// Fits the index to a key's matrix: the group is clamped to the last
    /// available group. The level is left for the matrix lookup to clamp.
    #[must_use]
    pub fn for_matrix(self, matrix: &KeysymMatrix) -> Self {
        let group = match matrix.num_groups() {
            0 => self.group,
            n => self.group.min(n - 1),
        };
        Self { group, ..self }
    }
}

/// A modifier's state change caused by one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModifierTransition {
    /// Modifier that changed
    pub modifier: Modifier,
    /// State before the press
    pub from: ModifierState,
    /// State after the press
    pub to: ModifierState,
}

/// Per-modifier state, all `Inactive` initially.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModifierTracker {
    states: BTreeMap<Modifier, ModifierState>,
}

impl ModifierTracker {
    /// Creates a tracker with every modifier inactive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of a modifier.
    #[must_use]
    pub fn state(&self, modifier: Modifier) -> ModifierState {
        self.states.get(&modifier).copied().unwrap_or_default()
    }

    /// Returns `true` if the modifier is latched or locked.
    #[must_use]
    pub fn is_active(&self, modifier: Modifier) -> bool {
        self.state(modifier).is_active()
    }

    /// Latched and locked modifiers, in modifier order.
    pub fn active_modifiers(&self) -> impl Iterator<Item = (Modifier, ModifierState)> + '_ {
        self.states.iter().map(|(m, s)| (*m, *s))
    }

    /// Returns `true` when no modifier is active.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.states.is_empty()
    }

    /// Applies a press of the modifier's own key.
    pub fn press_modifier(&mut self, modifier: Modifier, behavior: ModifierBehavior) -> ModifierTransition {
        let from = self.state(modifier);
        let to = from.on_modifier_press(behavior);
        self.set(modifier, to);
        if from != to {
            debug!(%modifier, ?from, ?to, ?behavior, "modifier state changed");
        }
        ModifierTransition { modifier, from, to }
    }

    /// Applies a non-modifier key press: every latched modifier is released.
    ///
    /// Returns the modifiers that were released.
    pub fn press_other(&mut self) -> Vec<Modifier> {
        let released: Vec<Modifier> = self
            .states
            .iter()
            .filter(|(_, state)| **state == ModifierState::Latched)
            .map(|(m, _)| *m)
            .collect();
        for modifier in &released {
            self.set(*modifier, ModifierState::Latched.on_other_press());
        }
        if !released.is_empty() {
            debug!(?released, "latched modifiers consumed");
        }
        released
    }

    /// Clears every latch and lock.
    pub fn reset(&mut self) {
        if !self.states.is_empty() {
            debug!("modifier state reset");
        }
        self.states.clear();
    }

    /// Combines the effects of all active modifiers.
    ///
    /// Group bits and level bits are ORed separately; modifiers with no
    /// configured effect don't contribute.
    #[must_use]
    pub fn resolve(&self, config: &ModifierConfig) -> LookupIndex {
        self.states
            .keys()
            .fold(LookupIndex::default(), |index, modifier| match config.effect(*modifier) {
                ModifierEffect::None => index,
                ModifierEffect::Group(bits) => LookupIndex {
                    group: index.group | usize::from(bits),
                    ..index
                },
                ModifierEffect::Level(bits) => LookupIndex {
                    level: index.level | usize::from(bits),
                    ..index
                },
            })
    }

    fn set(&mut self, modifier: Modifier, state: ModifierState) {
        // Only active modifiers are stored
        if state.is_active() {
            self.states.insert(modifier, state);
        } else {
            self.states.remove(&modifier);
        }
    }
}
