//! Modifier identities, behaviors and their effect on symbol lookup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Modifiers a key can act as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    /// Shift
    Shift,
    /// Caps Lock
    CapsLock,
    /// Control
    Control,
    /// Alt (Mod1)
    Alt,
    /// Super / Logo (Mod4)
    Super,
    /// AltGr, ISO level 3 shift (Mod5)
    AltGr,
    /// Group switch, selects the alternate symbol set
    GroupSwitch,
}

impl Modifier {
    /// All modifiers in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Shift,
        Self::CapsLock,
        Self::Control,
        Self::Alt,
        Self::Super,
        Self::AltGr,
        Self::GroupSwitch,
    ];
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shift => write!(f, "Shift"),
            Self::CapsLock => write!(f, "Caps Lock"),
            Self::Control => write!(f, "Control"),
            Self::Alt => write!(f, "Alt"),
            Self::Super => write!(f, "Super"),
            Self::AltGr => write!(f, "AltGr"),
            Self::GroupSwitch => write!(f, "Group Switch"),
        }
    }
}

/// What pressing a modifier key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierBehavior {
    /// Do nothing when the modifier key is pressed
    None,
    /// Toggle the modifier each time its key is pressed
    Lock,
    /// Enable the modifier until the next non-modifier key press
    #[default]
    Latch,
}

/// Current state of one modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierState {
    /// Not contributing to lookups
    #[default]
    Inactive,
    /// Active for exactly one non-modifier key press
    Latched,
    /// Active until its key is pressed again
    Locked,
}

impl ModifierState {
    /// Returns `true` for latched and locked modifiers.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Inactive)
    }

    /// State after the modifier's own key is pressed under `behavior`.
    ///
    /// An active modifier is toggled off by any non-`None` behavior, so a
    /// behavior change while the modifier is active never leaves it stuck.
    #[must_use]
    pub const fn on_modifier_press(self, behavior: ModifierBehavior) -> Self {
        match (self, behavior) {
            (state, ModifierBehavior::None) => state,
            (Self::Inactive, ModifierBehavior::Lock) => Self::Locked,
            (Self::Inactive, ModifierBehavior::Latch) => Self::Latched,
            (Self::Latched | Self::Locked, _) => Self::Inactive,
        }
    }

    /// State after a non-modifier key press.
    #[must_use]
    pub const fn on_other_press(self) -> Self {
        match self {
            Self::Latched => Self::Inactive,
            state => state,
        }
    }
}

/// How an active modifier changes the lookup cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "bits", rename_all = "snake_case")]
pub enum ModifierEffect {
    /// Modifier doesn't change the symbol (Control, Alt, ...)
    #[default]
    None,
    /// Bits ORed into the group index
    Group(u8),
    /// Bits ORed into the level index
    Level(u8),
}

/// Behavior and effect of one modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierSpec {
    /// What pressing the modifier key does
    pub behavior: ModifierBehavior,
    /// How the active modifier selects group and level
    #[serde(default)]
    pub effect: ModifierEffect,
}

impl ModifierSpec {
    /// Creates a spec.
    #[must_use]
    pub const fn new(behavior: ModifierBehavior, effect: ModifierEffect) -> Self {
        Self { behavior, effect }
    }
}

/// Per-modifier behavior configuration held by the keyboard.
///
/// Modifiers without an entry behave as [`ModifierBehavior::None`] with no
/// effect on lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierConfig {
    specs: BTreeMap<Modifier, ModifierSpec>,
}

impl Default for ModifierConfig {
    /// Shift and AltGr latch onto levels 1 and 2, Caps Lock locks level 1,
    /// Group Switch locks group 1, and the remaining modifiers latch without
    /// changing the symbol.
    fn default() -> Self {
        use ModifierBehavior::{Latch, Lock};
        use ModifierEffect as E;

        Self::empty()
            .with(Modifier::Shift, ModifierSpec::new(Latch, E::Level(1)))
            .with(Modifier::CapsLock, ModifierSpec::new(Lock, E::Level(1)))
            .with(Modifier::Control, ModifierSpec::new(Latch, E::None))
            .with(Modifier::Alt, ModifierSpec::new(Latch, E::None))
            .with(Modifier::Super, ModifierSpec::new(Latch, E::None))
            .with(Modifier::AltGr, ModifierSpec::new(Latch, E::Level(2)))
            .with(Modifier::GroupSwitch, ModifierSpec::new(Lock, E::Group(1)))
    }
}

impl ModifierConfig {
    /// Configuration with no modifier entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            specs: BTreeMap::new(),
        }
    }

    /// Adds or replaces the entry for a modifier.
    pub fn with(mut self, modifier: Modifier, spec: ModifierSpec) -> Self {
        self.specs.insert(modifier, spec);
        self
    }

    /// Spec for a modifier, if configured.
    #[must_use]
    pub fn spec(&self, modifier: Modifier) -> Option<&ModifierSpec> {
        self.specs.get(&modifier)
    }

    /// Behavior for a modifier (`None` when unconfigured).
    #[must_use]
    pub fn behavior(&self, modifier: Modifier) -> ModifierBehavior {
        self.specs
            .get(&modifier)
            .map_or(ModifierBehavior::None, |spec| spec.behavior)
    }

    /// Effect of a modifier (`None` when unconfigured).
    #[must_use]
    pub fn effect(&self, modifier: Modifier) -> ModifierEffect {
        self.specs
            .get(&modifier)
            .map_or(ModifierEffect::None, |spec| spec.effect)
    }

    /// Changes the behavior of a modifier, keeping its effect.
    pub fn set_behavior(&mut self, modifier: Modifier, behavior: ModifierBehavior) {
        self.specs
            .entry(modifier)
            .and_modify(|spec| spec.behavior = behavior)
            .or_insert(ModifierSpec::new(behavior, ModifierEffect::None));
    }

    /// Sets the same behavior for every configured modifier.
    pub fn set_all_behaviors(&mut self, behavior: ModifierBehavior) {
        for spec in self.specs.values_mut() {
            spec.behavior = behavior;
        }
    }

    /// Configured modifiers and their specs, ordered by modifier.
    pub fn iter(&self) -> impl Iterator<Item = (Modifier, &ModifierSpec)> {
        self.specs.iter().map(|(m, spec)| (*m, spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use ModifierBehavior as B;
        use ModifierState as S;

        assert_eq!(S::Inactive.on_modifier_press(B::None), S::Inactive);
        assert_eq!(S::Inactive.on_modifier_press(B::Lock), S::Locked);
        assert_eq!(S::Locked.on_modifier_press(B::Lock), S::Inactive);
        assert_eq!(S::Inactive.on_modifier_press(B::Latch), S::Latched);
        assert_eq!(S::Latched.on_modifier_press(B::Latch), S::Inactive);
        assert_eq!(S::Latched.on_other_press(), S::Inactive);
        assert_eq!(S::Locked.on_other_press(), S::Locked);
        assert_eq!(S::Inactive.on_other_press(), S::Inactive);
    }

    #[test]
    fn test_transition_after_behavior_change() {
        use ModifierBehavior as B;
        use ModifierState as S;

        assert_eq!(S::Locked.on_modifier_press(B::Latch), S::Inactive);
        assert_eq!(S::Latched.on_modifier_press(B::Lock), S::Inactive);
        assert_eq!(S::Locked.on_modifier_press(B::None), S::Locked);
    }

    #[test]
    fn test_default_config() {
        let config = ModifierConfig::default();
        assert_eq!(config.behavior(Modifier::Shift), ModifierBehavior::Latch);
        assert_eq!(config.effect(Modifier::Shift), ModifierEffect::Level(1));
        assert_eq!(config.behavior(Modifier::CapsLock), ModifierBehavior::Lock);
        assert_eq!(config.effect(Modifier::GroupSwitch), ModifierEffect::Group(1));
        assert_eq!(config.iter().count(), Modifier::ALL.len());
    }

    #[test]
    fn test_unconfigured_modifier_is_inert() {
        let config = ModifierConfig::empty();
        assert_eq!(config.behavior(Modifier::AltGr), ModifierBehavior::None);
        assert_eq!(config.effect(Modifier::AltGr), ModifierEffect::None);
    }

    #[test]
    fn test_set_behavior_keeps_effect() {
        let mut config = ModifierConfig::default();
        config.set_behavior(Modifier::Shift, ModifierBehavior::Lock);
        assert_eq!(config.behavior(Modifier::Shift), ModifierBehavior::Lock);
        assert_eq!(config.effect(Modifier::Shift), ModifierEffect::Level(1));

        let mut empty = ModifierConfig::empty();
        empty.set_behavior(Modifier::Alt, ModifierBehavior::Lock);
        assert_eq!(
            empty.spec(Modifier::Alt),
            Some(&ModifierSpec::new(ModifierBehavior::Lock, ModifierEffect::None))
        );
    }

    #[test]
    fn test_set_all_behaviors() {
        let mut config = ModifierConfig::default();
        config.set_all_behaviors(ModifierBehavior::Lock);
        assert!(config.iter().all(|(_, spec)| spec.behavior == ModifierBehavior::Lock));
    }
}
