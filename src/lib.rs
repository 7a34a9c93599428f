// Field Timestamps - Core Library
// Created/updated/per-field change times for entities, recorded by a write
// hook on each tracked field.

pub mod clock;
pub mod entities;
pub mod field;
pub mod predicates;
pub mod registry;
pub mod timestamps;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entities::{Order, OrderRecord, OrderStatus};
pub use field::TrackedField;
pub use predicates::{always, on_change, only_when_it_changes_to, only_when_it_leaves, ChangePredicate};
pub use registry::TimestampRegistry;
pub use timestamps::Timestamps;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
