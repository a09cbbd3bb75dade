//! Sort Model
//!
//! A `SortSpec` describes which server-side ordering the catalog listing uses.
//! Values are immutable: changing the sort means building a new spec and
//! handing it to the controller, never editing the current one.

use std::fmt;

/// Field the catalog orders by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Default, // Server's own ordering (newest additions first)
    Year,    // Publication year
    Size,    // File size in bytes
}

/// Direction of the ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Current sort field + direction
///
/// `Default` ignores direction, so the constructor canonicalises it and two
/// default specs always compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortSpec {
    field: SortField,
    direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        let direction = match field {
            SortField::Default => SortDirection::Descending,
            _ => direction,
        };
        Self { field, direction }
    }

    /// Ordering used when nothing has been requested
    pub fn default_order() -> Self {
        Self::new(SortField::Default, SortDirection::Descending)
    }

    pub fn year_desc() -> Self {
        Self::new(SortField::Year, SortDirection::Descending)
    }

    pub fn year_asc() -> Self {
        Self::new(SortField::Year, SortDirection::Ascending)
    }

    pub fn size_desc() -> Self {
        Self::new(SortField::Size, SortDirection::Descending)
    }

    pub fn size_asc() -> Self {
        Self::new(SortField::Size, SortDirection::Ascending)
    }

    pub fn field(&self) -> SortField {
        self.field
    }

    /// Direction, or `None` for the default ordering where it has no meaning
    pub fn direction(&self) -> Option<SortDirection> {
        match self.field {
            SortField::Default => None,
            _ => Some(self.direction),
        }
    }

    pub fn is_default(&self) -> bool {
        self.field == SortField::Default
    }

    /// `(sort, sortmode)` values sent to the catalog
    pub fn query_params(&self) -> Option<(&'static str, &'static str)> {
        crate::logic::sorting::query_params(self)
    }

    pub fn as_str(&self) -> &str {
        match (self.field, self.direction) {
            (SortField::Default, _) => "Default",
            (SortField::Year, SortDirection::Ascending) => "Year ↑",
            (SortField::Year, SortDirection::Descending) => "Year ↓",
            (SortField::Size, SortDirection::Ascending) => "Size ↑",
            (SortField::Size, SortDirection::Descending) => "Size ↓",
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::default_order()
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ignores_direction() {
        let a = SortSpec::new(SortField::Default, SortDirection::Ascending);
        let b = SortSpec::new(SortField::Default, SortDirection::Descending);
        assert_eq!(a, b);
        assert_eq!(a.direction(), None);
        assert!(a.is_default());
    }

    #[test]
    fn test_equality_requires_field_and_direction() {
        assert_eq!(SortSpec::year_desc(), SortSpec::year_desc());
        assert_ne!(SortSpec::year_desc(), SortSpec::year_asc());
        assert_ne!(SortSpec::year_desc(), SortSpec::size_desc());
        assert_ne!(SortSpec::year_desc(), SortSpec::default_order());
    }

    #[test]
    fn test_direction_reported_for_explicit_fields() {
        assert_eq!(
            SortSpec::size_asc().direction(),
            Some(SortDirection::Ascending)
        );
        assert_eq!(SortSpec::size_asc().field(), SortField::Size);
    }

    #[test]
    fn test_labels() {
        assert_eq!(SortSpec::default().to_string(), "Default");
        assert_eq!(SortSpec::year_asc().as_str(), "Year ↑");
        assert_eq!(SortSpec::size_desc().as_str(), "Size ↓");
    }
}
