//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. Two value objects with the same values are equal.

/// Marker trait for value objects.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: `Money(1500)`, `BlobRef("/blobs/…")`; equal when their values are equal
/// - **Entity**: an inventory record; the same record even after its `used` count changes
///
/// Value objects are immutable: to "modify" one, build a new one. That is what
/// lets an audit snapshot hold plain copies of a record's prices and image
/// reference without any later edit leaking into history.
///
/// ```ignore
/// let a = Money::new(1500);
/// let b = Money::new(1500);
/// assert_eq!(a, b);  // Equal by value, not identity
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
