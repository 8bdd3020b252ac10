pub const REQUIRED_MODES: [&str; 3] = ["light", "dark", "high-contrast"];

pub const LUFA_EXTENSION_KEY: &str = "lufa";
pub const TOKEN_VALUE_KEY: &str = "$value";
pub const TOKEN_EXTENSIONS_KEY: &str = "$extensions";
pub const LEGACY_THEMABLE_KEY: &str = "themable";

pub const DEFAULT_TOKENS_DIR: &str = "tokens";
pub const TOKEN_FILE_EXTENSION: &str = "json";

pub const ENV_LUFA_TOKENS_DIR: &str = "LUFA_TOKENS_DIR";

pub const REPORT_SCHEMA_VERSION: u32 = 1;
