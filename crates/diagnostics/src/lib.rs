// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logging for the counterfs workspace.
//!
//! Every crate logs through the macros below so a single environment
//! variable controls output:
//! - `COUNTERFS_LOG=off` (default) - no logs
//! - `COUNTERFS_LOG=info` - mounts, unmounts, rejected operations
//! - `COUNTERFS_LOG=debug` - node allocation, tree construction, reads and writes

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable consulted by [`init_diagnostics`].
pub const LOG_ENV: &str = "COUNTERFS_LOG";

static INIT: Once = Once::new();

/// Minimum level selected by a `COUNTERFS_LOG` value, `None` for `off`.
///
/// Unknown values fall back to `info`; the second field reports whether
/// the value was recognised.
pub fn parse_level(value: &str) -> (Option<emit::Level>, bool) {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" | "" => (None, true),
        "debug" => (Some(emit::Level::Debug), true),
        "info" => (Some(emit::Level::Info), true),
        "warn" => (Some(emit::Level::Warn), true),
        "error" => (Some(emit::Level::Error), true),
        _ => (Some(emit::Level::Info), false),
    }
}

/// Initialize diagnostics based on the `COUNTERFS_LOG` environment variable.
///
/// Safe to call multiple times; only the first call installs a runtime.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let value = std::env::var(LOG_ENV).unwrap_or_else(|_| "off".to_string());
        let (level, known) = parse_level(&value);
        let Some(level) = level else {
            return;
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        if !known {
            emit::warn!("Unknown {var} value {value}, using info", var: LOG_ENV, value: value.as_str());
        }

        // The runtime lives for the rest of the process.
        std::mem::forget(rt);
    });
}

/// Log basic operations (mounts, unmounts, rejected writes).
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (node allocation, tree construction, I/O sizes).
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log warning conditions (recoverable failures, fallbacks).
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures that abort an operation.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Using "error" instead of "fatal" for consistency with emit-rs
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/// Re-export the init function for convenience
pub use init_diagnostics as init;
