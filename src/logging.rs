//! Logging facade for the navigation engine.
//!
//! The gate, the registry and the menu pipeline log through these macros so
//! the host console can pick its backend with a feature flag. `log` and
//! `tracing` are **mutually exclusive**; enable at most one.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! Levels used by the crate:
//!
//! - `trace_log!`: per-node steps of the menu pipeline, cache hits.
//! - `debug_log!`: resolution progress, queued intents, guard verdicts.
//! - `info_log!`: gate phase transitions, login/logout, materialization.
//! - `warn_log!`: dropped menu nodes, missing screens, collaborator hiccups.
//! - `error_log!`: structural menu errors, route name collisions.
//!
//! ```ignore
//! use gpui_console_navigator::{debug_log, warn_log};
//!
//! debug_log!("Resolving '{}' for session epoch {}", path, epoch);
//! warn_log!("Screen '{}' is not registered, binding not-found view", id);
//! ```

/// Emit a **trace**-level message through the enabled backend.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!($($arg)*);
    };
}

/// Emit a **debug**-level message through the enabled backend.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!($($arg)*);
    };
}

/// Emit an **info**-level message through the enabled backend.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
        #[cfg(feature = "log")]
        ::log::info!($($arg)*);
    };
}

/// Emit a **warn**-level message through the enabled backend.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!($($arg)*);
    };
}

/// Emit an **error**-level message through the enabled backend.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);
        #[cfg(feature = "log")]
        ::log::error!($($arg)*);
    };
}
