//! Page category constants.
//!
//! Every routed page declares:
//!   - HTML `id` in the format `{entity}--{category}` (e.g. `"a001_topic--detail"`)
//!   - `data-page-category` with one of the constants below
//!
//! The entity part matches the `domain/` directory the page lives in.

/// Detail view of a single record.
pub const PAGE_CAT_DETAIL: &str = "detail";

/// System page (not found, errors).
pub const PAGE_CAT_SYSTEM: &str = "system";

/// All known category values.
pub const ALL_CATEGORIES: &[&str] = &[PAGE_CAT_DETAIL, PAGE_CAT_SYSTEM];

/// Validate that a page id matches the `{entity}--{category}` format.
pub fn is_valid_page_id(id: &str) -> bool {
    let parts: Vec<&str> = id.splitn(2, "--").collect();
    parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty()
}

/// Return true if the category value is recognised.
pub fn is_known_category(cat: &str) -> bool {
    ALL_CATEGORIES.contains(&cat)
}
