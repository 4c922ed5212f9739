use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Page and pageSize must be more than 0")]
    InvalidBounds,

    #[error("Page exceeds available data")]
    PageOutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub info: PageInfo,
}

/// Slice `items` into the 1-based `page` of width `page_size`.
///
/// An empty input yields an empty page for any valid page number; otherwise a
/// page starting past the end is an error.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Result<Page<T>, PaginationError> {
    if page < 1 || page_size < 1 {
        return Err(PaginationError::InvalidBounds);
    }

    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size);

    if start >= total_items && total_items > 0 {
        return Err(PaginationError::PageOutOfRange);
    }

    let end = start.saturating_add(page_size).min(total_items);
    let data = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    Ok(Page {
        data,
        info: PageInfo {
            current_page: page,
            total_pages,
            total_items,
        },
    })
}
