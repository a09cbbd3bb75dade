//! Sorting logic
//!
//! Pure functions mapping a `SortSpec` to the catalog's query parameters, to
//! persisted preference strings, and from free-form user input.

use anyhow::Result;

use crate::cache::StateStore;
use crate::model::{SortDirection, SortField, SortSpec};

/// Catalog sort field values
pub const SORT_YEAR_CONST: &str = "year";
pub const SORT_SIZE: &str = "filesize";

/// Catalog sort direction values
pub const SORT_TYPE_ASC: &str = "ASC";
pub const SORT_TYPE_DESC: &str = "DESC";

/// Preference keys holding the persisted sort
pub const SORT_TYPE_KEY: &str = "sortType";
pub const SORT_QUERY_KEY: &str = "sortQuery";

/// `(sort, sortmode)` query values, or `None` for the default ordering
///
/// The default ordering must not send a direction to the service.
pub fn query_params(spec: &SortSpec) -> Option<(&'static str, &'static str)> {
    let field = match spec.field() {
        SortField::Default => return None,
        SortField::Year => SORT_YEAR_CONST,
        SortField::Size => SORT_SIZE,
    };
    let direction = match spec.direction()? {
        SortDirection::Ascending => SORT_TYPE_ASC,
        SortDirection::Descending => SORT_TYPE_DESC,
    };
    Some((field, direction))
}

/// Rebuild a spec from persisted `sortType`/`sortQuery` values
///
/// Unknown or empty values fall back to the default ordering.
pub fn from_persisted(sort_type: &str, sort_query: &str) -> SortSpec {
    let field = match sort_type {
        SORT_YEAR_CONST => SortField::Year,
        SORT_SIZE => SortField::Size,
        _ => return SortSpec::default_order(),
    };
    let direction = match sort_query {
        SORT_TYPE_ASC => SortDirection::Ascending,
        SORT_TYPE_DESC => SortDirection::Descending,
        _ => return SortSpec::default_order(),
    };
    SortSpec::new(field, direction)
}

/// Read the persisted sort; missing keys mean the default ordering
pub fn load_sort(store: &dyn StateStore) -> Result<SortSpec> {
    let sort_type = store.load(SORT_TYPE_KEY)?.unwrap_or_default();
    let sort_query = store.load(SORT_QUERY_KEY)?.unwrap_or_default();
    Ok(from_persisted(&sort_type, &sort_query))
}

/// Persist a sort. The default ordering is stored as empty strings.
pub fn save_sort(store: &dyn StateStore, spec: &SortSpec) -> Result<()> {
    let (sort_type, sort_query) = query_params(spec).unwrap_or(("", ""));
    store.save(SORT_TYPE_KEY, sort_type)?;
    store.save(SORT_QUERY_KEY, sort_query)?;
    Ok(())
}

/// Parse user input like "default", "year desc", "size", "size asc"
///
/// A field without a direction means descending (largest / newest first).
pub fn parse_sort_spec(input: &str) -> Option<SortSpec> {
    let lowered = input.trim().to_lowercase();
    let mut words = lowered.split_whitespace();

    let field = match words.next()? {
        "default" | "none" => return Some(SortSpec::default_order()),
        "year" => SortField::Year,
        "size" | "filesize" => SortField::Size,
        _ => return None,
    };

    let direction = match words.next() {
        None | Some("desc") | Some("descending") => SortDirection::Descending,
        Some("asc") | Some("ascending") => SortDirection::Ascending,
        Some(_) => return None,
    };

    if words.next().is_some() {
        return None;
    }

    Some(SortSpec::new(field, direction))
}
