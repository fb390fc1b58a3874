//! Page slicing over an already-ordered collection.
//!
//! Pages are 1-based. Asking for a page past the end is not an error: it comes
//! back empty and flagged as the last page.

use crate::models::types::{GameError, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: usize,
    pub is_last_page: bool,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            is_last_page: self.is_last_page,
        }
    }
}

/// Slice `items` into page `page_number` of `page_size` entries.
pub fn paginate<T>(items: Vec<T>, page_number: usize, page_size: usize) -> Result<Page<T>> {
    if page_number == 0 || page_size == 0 {
        return Err(GameError::InvalidPage {
            page_number,
            page_size,
        });
    }

    let total = items.len();
    let start = (page_number - 1).saturating_mul(page_size);
    let end = page_number.saturating_mul(page_size);

    let items = items
        .into_iter()
        .skip(start)
        .take(end - start)
        .collect();

    Ok(Page {
        items,
        page_number,
        is_last_page: end >= total,
    })
}

/// [`paginate`] with a fixed page size.
#[derive(Clone, Copy, Debug)]
pub struct Paginator {
    page_size: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(GameError::InvalidPage {
                page_number: 1,
                page_size,
            });
        }

        Ok(Self { page_size })
    }

    pub fn page<T>(&self, items: Vec<T>, page_number: usize) -> Result<Page<T>> {
        paginate(items, page_number, self.page_size)
    }
}
