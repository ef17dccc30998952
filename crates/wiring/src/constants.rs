//! Crate-wide constants

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "wiring.toml";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "WIRING";

/// Separator between nested keys in environment variables
/// (`WIRING_REGISTRY__SCRATCH_CAPACITY`)
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// REGISTRY CONSTANTS
// ============================================================================

/// Default number of bindings a registry table is pre-sized for
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Default capacity of the argument scratch buffer
pub const DEFAULT_SCRATCH_CAPACITY: usize = 8;

/// Upper bound accepted for either capacity setting
pub const MAX_CAPACITY: usize = 1 << 16;

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_ENV_VAR: &str = "WIRING_LOG";
