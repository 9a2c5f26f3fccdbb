//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values: a
/// review with the same rating and comment as another is indistinguishable
/// from it. To "modify" one, build a new value.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
