// src/constants.rs

/// Case names that select the "on" branch of a switch option (matched case-insensitively).
pub const SWITCH_ON_NAMES: [&str; 4] = ["Yes", "yes", "Y", "y"];

/// Case names that select the "off" branch of a switch option (matched case-insensitively).
pub const SWITCH_OFF_NAMES: [&str; 4] = ["No", "no", "N", "n"];

/// Case name looked up when no switch case matches the "on" set.
pub const SWITCH_ON_FALLBACK: &str = "Yes";

/// Case name looked up when no switch case matches the "off" set.
pub const SWITCH_OFF_FALLBACK: &str = "No";

/// Raw input values that coerce to `true` for `bool` input fields (matched case-insensitively).
pub const TRUTHY_INPUTS: [&str; 4] = ["true", "1", "yes", "y"];

/// The literal an empty `int` input value coerces to.
pub const EMPTY_INT_LITERAL: &str = "0";

/// The serialized form of an empty override document.
pub const EMPTY_DOCUMENT: &str = "{}";

/// Default limit on how deep nested options may recurse.
pub const MAX_RECURSION_DEPTH: u32 = 32;

/// Default limit on how many options one task may resolve, nested ones included.
pub const MAX_RESOLUTIONS: u32 = 10_000;

/// The name of the directory holding pipeforge settings (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "pipeforge";

/// The name of the settings file.
pub const SETTINGS_FILENAME: &str = "config.toml";

/// Environment variable pointing at an alternative settings file.
pub const SETTINGS_ENV_VAR: &str = "PIPEFORGE_CONFIG";
