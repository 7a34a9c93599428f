// 📦 Order Entity - tracked fields wired into plain accessors
//
// "Order UUID is IDENTITY (never changes), status/quantity/note are VALUES"
//
// - quantity: every write is recorded (default predicate)
// - note: recorded only when the text actually changes
// - status: recorded under "shipped_at", only when the order becomes Shipped

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::field::TrackedField;
use crate::predicates::{on_change, only_when_it_changes_to};
use crate::registry::TimestampRegistry;
use crate::timestamps::Timestamps;

/// Timestamp key for the status field
pub const SHIPPED_AT: &str = "shipped_at";

// ============================================================================
// ORDER STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Paid => "Paid",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

// ============================================================================
// ORDER ENTITY
// ============================================================================

/// Order Entity
///
/// Owns its `Timestamps`; each tracked field holds a non-owning handle to it.
#[derive(Debug)]
pub struct Order {
    /// Stable identity (UUID) - NEVER changes
    id: String,

    timestamps: Timestamps,
    status: TrackedField<OrderStatus>,
    quantity: TrackedField<u32>,
    note: TrackedField<String>,
}

impl Order {
    /// Create new order with UUID, on the system clock
    pub fn new(quantity: u32) -> Self {
        Self::assemble(
            uuid::Uuid::new_v4().to_string(),
            Timestamps::new(),
            OrderStatus::Pending,
            quantity,
            String::new(),
        )
    }

    /// Create new order whose timestamps come from `clock`
    pub fn with_clock<C: Clock + 'static>(quantity: u32, clock: C) -> Self {
        Self::assemble(
            uuid::Uuid::new_v4().to_string(),
            Timestamps::with_clock(clock),
            OrderStatus::Pending,
            quantity,
            String::new(),
        )
    }

    /// Rebuild an order from its persisted form
    pub fn from_record(record: OrderRecord) -> Self {
        Self::assemble(
            record.id,
            Timestamps::from_registry(record.timestamps),
            record.status,
            record.quantity,
            record.note,
        )
    }

    fn assemble(
        id: String,
        timestamps: Timestamps,
        status: OrderStatus,
        quantity: u32,
        note: String,
    ) -> Self {
        let status = timestamps
            .track("status", status)
            .with_timestamp_key(SHIPPED_AT)
            .with_predicate(only_when_it_changes_to(OrderStatus::Shipped));
        let quantity = timestamps.track("quantity", quantity);
        let note = timestamps.track("note", note).with_predicate(on_change());

        Order {
            id,
            timestamps,
            status,
            quantity,
            note,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> OrderStatus {
        *self.status.read()
    }

    pub fn set_status(&mut self, status: OrderStatus) {
        self.status.write(status);
    }

    pub fn quantity(&self) -> u32 {
        *self.quantity.read()
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity.write(quantity);
    }

    pub fn note(&self) -> &str {
        self.note.read()
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note.write(note.into());
    }

    // ========================================================================
    // TIMESTAMPS
    // ========================================================================

    pub fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.timestamps.created_at()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.timestamps.updated_at()
    }

    /// When the order last became Shipped
    pub fn shipped_at(&self) -> Option<DateTime<Utc>> {
        self.status.last_changed()
    }

    /// Persisted form: values plus a copy of the timestamps
    pub fn to_record(&self) -> OrderRecord {
        OrderRecord {
            id: self.id.clone(),
            status: self.status(),
            quantity: self.quantity(),
            note: self.note().to_string(),
            timestamps: self.timestamps.snapshot(),
        }
    }
}

// ============================================================================
// ORDER RECORD
// ============================================================================

/// Serializable snapshot of an Order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    pub status: OrderStatus,
    pub quantity: u32,
    pub note: String,
    pub timestamps: TimestampRegistry,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 5, 10, 30, 0).unwrap()
    }

    fn test_order() -> Order {
        Order::with_clock(3, ManualClock::new(start()))
    }

    #[test]
    fn test_order_creation() {
        let order = test_order();

        assert!(!order.id().is_empty());
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.quantity(), 3);
        assert_eq!(order.note(), "");
        assert_eq!(order.created_at(), start());
        assert_eq!(order.updated_at(), start());
        assert!(order.shipped_at().is_none());
        assert!(order.timestamps().registry().is_empty());
    }

    #[test]
    fn test_order_status_only_records_shipping() {
        let mut order = test_order();

        order.set_status(OrderStatus::Paid);
        assert_eq!(order.status(), OrderStatus::Paid);
        assert!(order.shipped_at().is_none());
        assert_eq!(order.updated_at(), start());

        order.set_status(OrderStatus::Shipped);
        let shipped = order.shipped_at().unwrap();
        assert_eq!(order.updated_at(), shipped);

        order.set_status(OrderStatus::Delivered);
        assert_eq!(order.status(), OrderStatus::Delivered);
        assert_eq!(order.shipped_at(), Some(shipped));
        assert_eq!(order.updated_at(), shipped);

        assert!(order.timestamps().get("status").is_none());
    }

    #[test]
    fn test_order_note_ignores_identical_text() {
        let mut order = test_order();

        order.set_note("leave at the door");
        let first = order.timestamps().get("note").unwrap();

        order.set_note("leave at the door");
        assert_eq!(order.timestamps().get("note"), Some(first));
        assert_eq!(order.updated_at(), first);
    }

    #[test]
    fn test_order_quantity_records_every_write() {
        let mut order = test_order();

        order.set_quantity(3);
        let first = order.timestamps().get("quantity").unwrap();
        order.set_quantity(3);
        let second = order.timestamps().get("quantity").unwrap();

        assert!(second > first);
        assert_eq!(order.updated_at(), second);
    }

    #[test]
    fn test_order_fields_are_independent() {
        let mut order = test_order();

        order.set_status(OrderStatus::Shipped);
        let shipped = order.shipped_at().unwrap();

        order.set_quantity(10);
        order.set_note("fragile");

        assert_eq!(order.shipped_at(), Some(shipped));
        assert!(order.updated_at() > shipped);
    }

    #[test]
    fn test_order_record_round_trip() {
        let mut order = test_order();
        order.set_status(OrderStatus::Shipped);
        order.set_note("gift wrap");

        let record = order.to_record();
        let json = serde_json::to_string(&record).unwrap();
        let restored = Order::from_record(serde_json::from_str(&json).unwrap());

        assert_eq!(restored.id(), order.id());
        assert_eq!(restored.status(), OrderStatus::Shipped);
        assert_eq!(restored.note(), "gift wrap");
        assert_eq!(restored.created_at(), order.created_at());
        assert_eq!(restored.updated_at(), order.updated_at());
        assert_eq!(restored.shipped_at(), order.shipped_at());
        assert_eq!(restored.to_record(), record);
    }

    #[test]
    fn test_restored_order_keeps_tracking() {
        let mut order = test_order();
        order.set_status(OrderStatus::Shipped);

        let mut restored = Order::from_record(order.to_record());
        restored.set_status(OrderStatus::Cancelled);
        restored.set_status(OrderStatus::Shipped);

        let reshipped = restored.shipped_at().unwrap();
        assert!(reshipped > order.shipped_at().unwrap());
        assert_eq!(restored.updated_at(), reshipped);
        assert!(restored.updated_at() - restored.created_at() > Duration::zero());
    }

    #[test]
    fn test_order_status_as_str() {
        assert_eq!(OrderStatus::Pending.as_str(), "Pending");
        assert_eq!(OrderStatus::Shipped.as_str(), "Shipped");
        assert_eq!(OrderStatus::Cancelled.as_str(), "Cancelled");
    }
}
