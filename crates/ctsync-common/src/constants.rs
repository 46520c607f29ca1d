//! Protocol constants and defaults.

/// Wire value that ends a status-reporting connection.
pub const TERMINAL_STATUS: &str = "stopped";

/// Default cap on the bytes buffered for a single undecoded message.
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 64 * 1024;

/// Binary name for the CLI.
pub const BIN_NAME: &str = "ctsync";
