//! Logging utilities.

mod deprecation;
mod subscriber;

#[cfg(test)]
pub use deprecation::MockDeprecationLogger;
pub use deprecation::{DeprecationLogger, NoOpDeprecationLogger, TracingDeprecationLogger};
pub use subscriber::init_tracing;
