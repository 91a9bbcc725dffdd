//! Mapper configuration

use serde::{Deserialize, Serialize};

/// Environment variable that turns on best-effort mapping
pub const ENV_MAPPING_IGNORE_ERRORS: &str = "COPYMAP_MAPPING_IGNORE_ERRORS";

/// Options applied to every mapper built by a factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapperConfig {
    /// Skip fields whose expression fails instead of failing the whole apply
    #[serde(default)]
    pub ignore_errors: bool,
}

impl MapperConfig {
    /// Configuration with ignore-errors set explicitly
    pub fn new(ignore_errors: bool) -> Self {
        Self { ignore_errors }
    }

    /// Read [`ENV_MAPPING_IGNORE_ERRORS`]; unset or unparsable means off
    pub fn from_env() -> Self {
        let ignore_errors = std::env::var(ENV_MAPPING_IGNORE_ERRORS)
            .ok()
            .and_then(|value| parse_bool(&value))
            .unwrap_or(false);
        Self { ignore_errors }
    }
}

/// Lenient boolean parsing for environment flags
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
