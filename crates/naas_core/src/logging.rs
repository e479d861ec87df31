//! Logging capability
//!
//! The engine never talks to a logging backend directly; it emits through
//! this minimal capability, injected once at construction. A sink failure
//! (or the no-op sink) must never affect the decision path.

/// Severity levels the engine emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Error,
}

/// Minimal leveled logging surface consumed by the engine
pub trait ChaosLogger: Send + Sync {
    /// Generic sink; the leveled methods dispatch here by default
    fn log(&self, level: LogLevel, message: &str);

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// Default logger that forwards to the `tracing` macros
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ChaosLogger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!(target: "naas", "{message}"),
            LogLevel::Info => tracing::info!(target: "naas", "{message}"),
            LogLevel::Error => tracing::error!(target: "naas", "{message}"),
        }
    }
}

/// Logger that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl ChaosLogger for NoopLogger {
    fn log(&self, _level: LogLevel, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[derive(Default)]
    struct CapturingLogger {
        events: Arc<Mutex<Vec<(LogLevel, String)>>>,
    }

    impl ChaosLogger for CapturingLogger {
        fn log(&self, level: LogLevel, message: &str) {
            self.events.lock().push((level, message.to_string()));
        }
    }

    #[test]
    fn leveled_methods_dispatch_to_log() {
        let logger = CapturingLogger::default();
        logger.info("injected");
        logger.error("failed");
        logger.debug("skipped");

        let events = logger.events.lock();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], (LogLevel::Info, "injected".to_string()));
        assert_eq!(events[1], (LogLevel::Error, "failed".to_string()));
        assert_eq!(events[2], (LogLevel::Debug, "skipped".to_string()));
    }

    #[test]
    fn noop_logger_accepts_everything() {
        let logger = NoopLogger;
        logger.info("dropped");
        logger.error("also dropped");
    }
}
