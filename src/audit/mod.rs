pub mod logger;

pub use logger::{AuditLogger, Interruption};
