//! Shared test fixtures for integration tests.
#![allow(dead_code)] // Not every test file uses every fixture

use std::sync::Arc;
use vkeyboard::models::{
    Angle, Bounds, Color, Element, KeyData, KeysymMatrix, Modifier, ModifierConfig, Orientation,
    Outline,
};
use vkeyboard::{LayoutSession, LayoutTree, NodeId};

pub const KEYBOARD: u32 = 0;
pub const ALPHA_SECTION: u32 = 1;
pub const MODS_SECTION: u32 = 2;

pub const SHIFT: u32 = 100;
pub const KEY_A: u32 = 101;
pub const KEY_Q: u32 = 102;

pub const GROUP_SWITCH: u32 = 200;
pub const CAPS_LOCK: u32 = 201;
pub const ALT_GR: u32 = 202;

pub const KEYCODE_SHIFT: u32 = 50;
pub const KEYCODE_A: u32 = 38;
pub const KEYCODE_Q: u32 = 24;

pub const XK_A_LOWER: u32 = 97;
pub const XK_A_UPPER: u32 = 65;
pub const XK_CYRILLIC_EF_LOWER: u32 = 1092;
pub const XK_CYRILLIC_EF_UPPER: u32 = 1060;
pub const XK_Q_LOWER: u32 = 113;
pub const XK_Q_UPPER: u32 = 81;

/// Builds a keyboard with two sections.
///
/// Section "alpha" at (10, 10), unrotated, one row:
/// Shift (15 wide), `a` (10x10 rounded outline, two groups), `q` (one group).
///
/// Section "mods" at (10, 40), rotated a quarter turn, one row of 20x10 keys:
/// Group Switch, Caps Lock, AltGr.
///
/// Effective bounds: alpha (10, 10, 35, 10), mods (0, 40, 10, 60).
pub fn two_section_keyboard(modifiers: ModifierConfig) -> (LayoutTree, NodeId) {
    let mut tree = LayoutTree::new();
    let keyboard = tree.insert(Element::keyboard(KEYBOARD, modifiers).with_name("test"));

    let key_fill = Arc::new(Color::from_rgb8(0xee, 0xee, 0xec));
    let mod_fill = Arc::new(Color::from_rgb8(0xba, 0xbd, 0xb6));
    let square = Arc::new(Outline::rectangle(10.0, 10.0, 2.0));

    let alpha = tree.insert(
        Element::section(ALPHA_SECTION, Orientation::Horizontal)
            .with_name("alpha")
            .with_rows(1)
            .with_bounds(Bounds::new(10.0, 10.0, 35.0, 10.0)),
    );
    let alpha_keys = [
        Element::key(
            SHIFT,
            KeyData::new(KEYCODE_SHIFT, KeysymMatrix::new(vec![65505], 1, 1).unwrap())
                .with_modifier(Modifier::Shift)
                .with_fill(Arc::clone(&mod_fill)),
        )
        .with_name("LFSH")
        .with_bounds(Bounds::new(0.0, 0.0, 15.0, 10.0)),
        Element::key(
            KEY_A,
            KeyData::new(
                KEYCODE_A,
                KeysymMatrix::from_groups([
                    vec![XK_A_LOWER, XK_A_UPPER],
                    vec![XK_CYRILLIC_EF_LOWER, XK_CYRILLIC_EF_UPPER],
                ]),
            )
            .with_outline(Arc::clone(&square))
            .with_fill(Arc::clone(&key_fill)),
        )
        .with_name("AC01")
        .with_bounds(Bounds::new(15.0, 0.0, 10.0, 10.0)),
        Element::key(
            KEY_Q,
            KeyData::new(
                KEYCODE_Q,
                KeysymMatrix::new(vec![XK_Q_LOWER, XK_Q_UPPER], 1, 2).unwrap(),
            )
            .with_fill(Arc::clone(&key_fill)),
        )
        .with_name("AD01")
        .with_bounds(Bounds::new(25.0, 0.0, 10.0, 10.0)),
    ];

    let mods = tree.insert(
        Element::section(MODS_SECTION, Orientation::Horizontal)
            .with_name("mods")
            .with_rows(1)
            .with_bounds(Bounds::new(10.0, 40.0, 60.0, 10.0))
            .with_angle(Angle::from_tenths(900)),
    );
    let mod_keys = [
        (GROUP_SWITCH, 92, 65406, Modifier::GroupSwitch),
        (CAPS_LOCK, 66, 65509, Modifier::CapsLock),
        (ALT_GR, 108, 65027, Modifier::AltGr),
    ]
    .into_iter()
    .zip([0.0, 20.0, 40.0])
    .map(|((id, keycode, keysym, modifier), x)| {
        Element::key(
            id,
            KeyData::new(keycode, KeysymMatrix::new(vec![keysym], 1, 1).unwrap())
                .with_modifier(modifier)
                .with_fill(Arc::clone(&mod_fill)),
        )
        .with_bounds(Bounds::new(x, 0.0, 20.0, 10.0))
    });

    tree.add_child(keyboard, alpha).unwrap();
    tree.add_child(keyboard, mods).unwrap();
    for key in alpha_keys {
        let node = tree.insert(key);
        tree.add_child(alpha, node).unwrap();
    }
    for key in mod_keys {
        let node = tree.insert(key);
        tree.add_child(mods, node).unwrap();
    }

    (tree, keyboard)
}

/// Session on [`two_section_keyboard`] with the default modifier configuration.
pub fn default_session() -> LayoutSession {
    let (tree, keyboard) = two_section_keyboard(ModifierConfig::default());
    LayoutSession::new(tree, keyboard).unwrap()
}
