//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Implemented by the stored records so the in-memory tables can key them
/// generically.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Ord + core::fmt::Debug + Into<i64>;

    /// Human-readable entity name used in `NotFound` errors and logs.
    const KIND: &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
