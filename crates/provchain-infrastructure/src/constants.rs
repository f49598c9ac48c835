//! Infrastructure layer constants

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "provchain.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "provchain";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "PROVCHAIN";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_NESTING_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV_VAR: &str = "PROVCHAIN_LOG";

// ============================================================================
// REGISTRY CONSTANTS
// ============================================================================

/// Name given to a registry built from an unnamed collection
pub const DEFAULT_REGISTRY_NAME: &str = "registry";

/// Suffix appended to a base registry's name for its overlay
pub const OVERLAY_NAME_SUFFIX: &str = "overlay";
