//! Crate-wide constants.

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "vkeyboard";

/// Config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";
