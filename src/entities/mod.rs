// Entity Models - examples of tracked entities
//
// Each entity owns one Timestamps and one TrackedField per tracked
// attribute, exposed through ordinary getters/setters.

pub mod order;

pub use order::{Order, OrderRecord, OrderStatus, SHIPPED_AT};
