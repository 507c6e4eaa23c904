//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are compared by their attribute values
/// (`Money`, `TaxRate`, a line's `Discount`). To "modify" one, build a new one.
///
/// ```ignore
/// let a = Money::new(150_000);
/// let b = Money::new(150_000);
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
