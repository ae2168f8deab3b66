//! Page slicing for listings.

use serde::Serialize;

use crate::error::{Error, Result};

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number that was requested.
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Number of pages needed for `len` items at `page_size` per page.
///
/// Zero for an empty listing or a zero page size.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Returns page `page` (1-based) of `items`.
///
/// Every page is full except possibly the last; a page past the end is
/// empty. Page 0 is treated as page 1.
///
/// # Errors
///
/// Returns `Error::InvalidInput` if `page_size` is zero.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Result<Page<T>> {
    if page_size == 0 {
        return Err(Error::invalid_input("page_size", "must be > 0"));
    }
    let page = page.max(1);
    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());

    Ok(Page {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total_items: items.len(),
        total_pages: total_pages(items.len(), page_size),
    })
}
