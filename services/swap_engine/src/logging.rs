//! Standardized emoji logging for the swap engine
//!
//! Keeps emoji usage consistent across resolver, simulation and execution
//! log lines so a replay log can be scanned by eye.

/// Standard emoji set for swap engine logging
pub struct LogEmoji;

impl LogEmoji {
    pub const ROUTE: &'static str = "🔍"; // Pool lookup
    pub const QUOTE: &'static str = "📊"; // Local estimate
    pub const SIMULATION: &'static str = "⏱️"; // Authoritative simulation
    pub const EXECUTE: &'static str = "⚡"; // Execution request
    pub const POOL: &'static str = "🏊"; // Snapshot refresh
    pub const SWAP: &'static str = "🔄"; // Direction reversal
    pub const BLOCKED: &'static str = "🚫"; // Rejected submit
}

#[macro_export]
macro_rules! log_quote {
    ($($arg:tt)*) => {
        tracing::debug!("{} {}", $crate::logging::LogEmoji::QUOTE, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_route {
    ($($arg:tt)*) => {
        tracing::debug!("{} {}", $crate::logging::LogEmoji::ROUTE, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_simulation {
    ($($arg:tt)*) => {
        tracing::debug!("{} {}", $crate::logging::LogEmoji::SIMULATION, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_execution {
    ($($arg:tt)*) => {
        tracing::info!("{} {}", $crate::logging::LogEmoji::EXECUTE, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_rejected {
    ($($arg:tt)*) => {
        tracing::info!("{} {}", $crate::logging::LogEmoji::BLOCKED, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_pool {
    ($($arg:tt)*) => {
        tracing::debug!("{} {}", $crate::logging::LogEmoji::POOL, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_reverse {
    ($($arg:tt)*) => {
        tracing::debug!("{} {}", $crate::logging::LogEmoji::SWAP, format!($($arg)*))
    };
}
