//! Offset pagination for list queries

/// Page used when the client does not send one
pub const DEFAULT_PAGE: i32 = 1;
/// Page size used when the client does not send one
pub const DEFAULT_PER_PAGE: i32 = 10;
/// Largest page size a client may request
pub const MAX_PER_PAGE: i32 = 100;

/// Convert `page`/`perPage` arguments into `(offset, limit)`.
///
/// Pages are 1-based; anything below 1 is page 1. `per_page` is clamped
/// to `1..=MAX_PER_PAGE`.
pub fn page_to_offset(page: i32, per_page: i32) -> (i64, i64) {
    let page = i64::from(page.max(1));
    let limit = i64::from(per_page.clamp(1, MAX_PER_PAGE));
    ((page - 1) * limit, limit)
}
