use std::ops::Range;

// ---------------------------------------------------------------------------
// Pagination over a filtered view (1-based pages)
// ---------------------------------------------------------------------------

/// Navigation state handed to the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// `ceil(rows / page_size)`, never less than 1.
pub fn total_pages(rows: usize, page_size: usize) -> usize {
    rows.div_ceil(page_size.max(1)).max(1)
}

/// Bring `page` back into `1..=total_pages`.
pub fn clamp_page(page: usize, rows: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(rows, page_size))
}

/// Positions within the view covered by `page` (already clamped).
pub fn page_range(page: usize, rows: usize, page_size: usize) -> Range<usize> {
    let page = clamp_page(page, rows, page_size);
    let start = ((page - 1) * page_size).min(rows);
    let end = (start + page_size).min(rows);
    start..end
}

pub fn page_info(page: usize, rows: usize, page_size: usize) -> PageInfo {
    let total = total_pages(rows, page_size);
    let current = page.clamp(1, total);
    PageInfo {
        current,
        total,
        has_prev: current > 1,
        has_next: current < total,
    }
}
