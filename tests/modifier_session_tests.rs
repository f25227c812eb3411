//! Integration tests for key presses and modifier state.
//!
//! Covers the latch/lock cycle of each default modifier and how the resolved
//! group and level pick a symbol from each key's matrix.

mod fixtures;

use fixtures::*;
use vkeyboard::models::{
    Element, ElementId, GroupPolicy, KeyData, KeysymMatrix, Modifier, ModifierBehavior,
    ModifierConfig, ModifierState, NO_SYMBOL,
};
use vkeyboard::{IndexAxis, KeyboardError, LayoutSession, LookupIndex};

#[test]
fn test_latched_shift_then_letter() {
    let mut session = default_session();
    session.press(ElementId(SHIFT)).unwrap();

    let first = session.press(ElementId(KEY_A)).unwrap();
    assert_eq!(first.keysym, XK_A_UPPER);
    assert_eq!(first.index, LookupIndex { group: 0, level: 1 });
    assert_eq!(first.released, vec![Modifier::Shift]);

    let second = session.press(ElementId(KEY_A)).unwrap();
    assert_eq!(second.keysym, XK_A_LOWER);
    assert!(second.released.is_empty());
    assert!(session.modifiers().is_idle());
}

#[test]
fn test_caps_lock_twice_restores_state() {
    let mut session = default_session();
    session.press(ElementId(CAPS_LOCK)).unwrap();
    assert_eq!(session.modifier_state(Modifier::CapsLock), ModifierState::Locked);

    assert_eq!(session.press(ElementId(KEY_Q)).unwrap().keysym, XK_Q_UPPER);
    assert_eq!(session.press(ElementId(KEY_Q)).unwrap().keysym, XK_Q_UPPER);

    let press = session.press(ElementId(CAPS_LOCK)).unwrap();
    assert_eq!(press.transition.unwrap().to, ModifierState::Inactive);
    assert_eq!(session.press(ElementId(KEY_Q)).unwrap().keysym, XK_Q_LOWER);
}

#[test]
fn test_shift_with_caps_lock_stays_on_level_one() {
    let mut session = default_session();
    session.press(ElementId(CAPS_LOCK)).unwrap();
    session.press(ElementId(SHIFT)).unwrap();

    let press = session.press(ElementId(KEY_A)).unwrap();
    assert_eq!(press.keysym, XK_A_UPPER);
    assert_eq!(press.released, vec![Modifier::Shift]);
    assert_eq!(session.modifier_state(Modifier::CapsLock), ModifierState::Locked);
}

#[test]
fn test_group_switch_selects_second_group() {
    let mut session = default_session();
    session.press(ElementId(GROUP_SWITCH)).unwrap();

    assert_eq!(session.press(ElementId(KEY_A)).unwrap().keysym, XK_CYRILLIC_EF_LOWER);

    session.press(ElementId(SHIFT)).unwrap();
    assert_eq!(session.press(ElementId(KEY_A)).unwrap().keysym, XK_CYRILLIC_EF_UPPER);

    // One-group key: the group is clamped to the key's last group
    let press = session.press(ElementId(KEY_Q)).unwrap();
    assert_eq!(press.keysym, XK_Q_LOWER);
    assert_eq!(press.index.group, 0);
}

#[test]
fn test_level_beyond_matrix_is_clamped() {
    let mut session = default_session();
    session.press(ElementId(ALT_GR)).unwrap();
    session.press(ElementId(SHIFT)).unwrap();

    let press = session.press(ElementId(KEY_A)).unwrap();
    assert_eq!(press.index.level, 3);
    assert_eq!(press.keysym, XK_A_UPPER);
    assert_eq!(press.released, vec![Modifier::Shift, Modifier::AltGr]);
}

#[test]
fn test_press_by_keycode() {
    let mut session = default_session();
    let press = session.press_keycode(KEYCODE_SHIFT).unwrap();
    assert_eq!(press.element, ElementId(SHIFT));
    assert_eq!(session.press_keycode(KEYCODE_A).unwrap().keysym, XK_A_UPPER);
}

#[test]
fn test_explicit_lookup_follows_group_policy() {
    let session = default_session();
    assert_eq!(session.lookup(ElementId(KEY_A), 1, 1), Ok(XK_CYRILLIC_EF_UPPER));
    assert_eq!(session.lookup(ElementId(KEY_Q), 0, 9), Ok(XK_Q_UPPER));
    assert_eq!(
        session.lookup(ElementId(KEY_Q), 1, 0),
        Err(KeyboardError::IndexOutOfRange {
            axis: IndexAxis::Group,
            index: 1,
            len: 1
        })
    );

    let (mut tree, keyboard) = two_section_keyboard(ModifierConfig::default());
    if let Some(data) = tree.get_mut(keyboard).and_then(|e| e.as_keyboard_mut()) {
        data.group_policy = GroupPolicy::Clamp;
    }
    let clamping = LayoutSession::new(tree, keyboard).unwrap();
    assert_eq!(clamping.lookup(ElementId(KEY_Q), 1, 0), Ok(XK_Q_LOWER));
}

#[test]
fn test_all_modifiers_locking() {
    let mut modifiers = ModifierConfig::default();
    modifiers.set_all_behaviors(ModifierBehavior::Lock);
    let (tree, keyboard) = two_section_keyboard(modifiers);
    let mut session = LayoutSession::new(tree, keyboard).unwrap();

    session.press(ElementId(SHIFT)).unwrap();
    for _ in 0..3 {
        let press = session.press(ElementId(KEY_Q)).unwrap();
        assert_eq!(press.keysym, XK_Q_UPPER);
        assert!(press.released.is_empty());
    }
}

#[test]
fn test_none_behavior_ignores_modifier_key() {
    let mut session = default_session();
    session.set_modifier_behavior(Modifier::Shift, ModifierBehavior::None);

    let press = session.press(ElementId(SHIFT)).unwrap();
    let transition = press.transition.unwrap();
    assert_eq!(transition.from, transition.to);
    assert_eq!(session.press(ElementId(KEY_A)).unwrap().keysym, XK_A_LOWER);
}

#[test]
fn test_current_symbol_tracks_modifiers() {
    let mut session = default_session();
    assert_eq!(session.current_symbol(ElementId(KEY_A)), Ok(XK_A_LOWER));
    session.press(ElementId(SHIFT)).unwrap();
    assert_eq!(session.current_symbol(ElementId(KEY_A)), Ok(XK_A_UPPER));
    session.reset_modifiers();
    assert_eq!(session.current_symbol(ElementId(KEY_A)), Ok(XK_A_LOWER));
}

#[test]
fn test_press_on_section_is_rejected() {
    let mut session = default_session();
    session.press(ElementId(SHIFT)).unwrap();
    assert_eq!(
        session.press(ElementId(ALPHA_SECTION)),
        Err(KeyboardError::NotAKey { element: ElementId(ALPHA_SECTION) })
    );
    assert_eq!(session.modifier_state(Modifier::Shift), ModifierState::Latched);
}

#[test]
fn test_symbol_less_modifier_key_still_changes_state() {
    let (mut tree, keyboard) = two_section_keyboard(ModifierConfig::default());
    let alpha = tree.find_by_id(keyboard, ElementId(ALPHA_SECTION)).unwrap();
    let right_shift = tree.insert(Element::key(
        300,
        KeyData::new(62, KeysymMatrix::default()).with_modifier(Modifier::Shift),
    ));
    tree.add_child(alpha, right_shift).unwrap();
    let mut session = LayoutSession::new(tree, keyboard).unwrap();

    let press = session.press(ElementId(300)).unwrap();
    assert_eq!(press.keysym, NO_SYMBOL);
    assert_eq!(session.modifier_state(Modifier::Shift), ModifierState::Latched);
    assert_eq!(session.press(ElementId(KEY_A)).unwrap().keysym, XK_A_UPPER);

    // Latches again after the first latch was consumed
    let blank = session.press(ElementId(300)).unwrap();
    assert_eq!(blank.transition.unwrap().to, ModifierState::Latched);
    assert!(session.lookup(ElementId(300), 0, 0).is_err());
    assert_eq!(session.press(ElementId(KEY_Q)).unwrap().keysym, XK_Q_UPPER);
}

#[test]
fn test_key_highlight_state() {
    let mut session = default_session();
    session.press(ElementId(CAPS_LOCK)).unwrap();
    session.press(ElementId(SHIFT)).unwrap();

    assert_eq!(session.is_key_locked(ElementId(CAPS_LOCK)), Ok(true));
    assert_eq!(session.is_key_latched(ElementId(SHIFT)), Ok(true));
    assert_eq!(session.is_key_locked(ElementId(SHIFT)), Ok(false));
    assert_eq!(session.key_state(ElementId(KEY_A)), Ok(ModifierState::Inactive));

    session.press(ElementId(KEY_A)).unwrap();
    assert_eq!(session.is_key_latched(ElementId(SHIFT)), Ok(false));
    assert_eq!(session.is_key_locked(ElementId(CAPS_LOCK)), Ok(true));
}
