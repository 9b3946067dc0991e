/// A normalized window into an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u64,
    pub limit: u32,
}

/// Turn a user supplied 1-based page number and page size into an
/// offset/limit pair. Nothing is rejected: a page size below 1 falls back
/// to `default_size`, anything above `max_size` is clamped, and page numbers
/// below 1 select the first page.
///
/// Callers guarantee `1 <= default_size <= max_size`.
pub fn normalize(page_number: i64, page_size: i64, default_size: u32, max_size: u32) -> Page {
    let mut size = page_size;
    if size < 1 {
        size = i64::from(default_size);
    }
    if size > i64::from(max_size) {
        size = i64::from(max_size);
    }

    let mut number = page_number.saturating_sub(1);
    if number < 0 {
        number = 0;
    }

    Page {
        offset: number.saturating_mul(size) as u64,
        limit: size as u32,
    }
}
