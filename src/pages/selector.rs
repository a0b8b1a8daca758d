//! Page selector parsing
//!
//! A selector is a comma-separated list of 1-based page numbers and
//! inclusive `start-end` ranges, e.g. `"1-3,5,7"`. Parsing is pure string
//! work, independent of any document library; the caller supplies only the
//! page count to bound the expansion.

/// Expand a selector into an ordered list of 1-based page numbers.
///
/// The expansion preserves the selector's left-to-right order, including
/// duplicates and reordering (`"2,1-1,2"` yields `[2, 1, 2]`). Malformed
/// parts, zeros, and entries beyond `max_page` are silently skipped; range
/// ends are clamped into `1..=max_page` before the range is materialized,
/// so a selector like `"1-4000000000"` never allocates beyond the
/// document's size.
pub fn parse_page_selector(selector: &str, max_page: u32) -> Vec<u32> {
    let mut pages = Vec::new();
    for part in selector.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some((start, end)) = part.split_once('-') {
            if let (Ok(a), Ok(b)) = (start.trim().parse::<u32>(), end.trim().parse::<u32>()) {
                pages.extend(a.max(1)..=b.min(max_page));
            }
        } else if let Ok(n) = part.parse::<u32>() {
            if n >= 1 && n <= max_page {
                pages.push(n);
            }
        }
    }
    pages
}
