//! Page type and pagination arithmetic.

use std::ops::RangeInclusive;

use serde::Deserialize;
use serde::Serialize;

use super::state::TableState;

/// One page of rows from a list endpoint.
///
/// `count` is the total number of rows across all pages, not `results.len()`.
///
/// # Example
///
/// ```ignore
/// let page: Page<Employee> = fetcher.fetch(table.state()).await?;
///
/// for employee in page.results() {
///     println!("{}", employee.name);
/// }
/// println!("{} employees in total", page.count());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<Row> {
    results: Vec<Row>,
    count: u64,
}

impl<Row> Page<Row> {
    /// Creates a page with rows and the server-side total.
    pub fn new(results: Vec<Row>, count: u64) -> Self {
        Self { results, count }
    }

    /// Creates an empty page with a zero total.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// Returns the rows in this page.
    pub fn results(&self) -> &[Row] {
        &self.results
    }

    /// Consumes the page and returns the rows.
    pub fn into_results(self) -> Vec<Row> {
        self.results
    }

    /// Returns the total row count across all pages.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns the number of rows in this page.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Maps every row.
    pub fn map<U, F: FnMut(Row) -> U>(self, f: F) -> Page<U> {
        Page {
            results: self.results.into_iter().map(f).collect(),
            count: self.count,
        }
    }
}

/// Navigation bounds for a server-paginated table.
///
/// The table state never checks page bounds itself; page controls ask this
/// type which pages exist before calling `set_page`.
///
/// # Example
///
/// ```
/// use datagrid_lib::table::Pagination;
///
/// let pagination = Pagination::new(3, 20, 45);
/// assert_eq!(pagination.total_pages(), 3);
/// assert_eq!(pagination.next_page(), None);
/// assert_eq!(pagination.rows_on_page(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    page_size: u32,
    count: u64,
}

impl Pagination {
    /// Creates pagination info for `page` of size `page_size` over `count` rows.
    pub fn new(page: u32, page_size: u32, count: u64) -> Self {
        Self {
            page,
            page_size: page_size.max(1),
            count,
        }
    }

    /// Pagination for `state` once the server reported `count`.
    pub fn for_state(state: &TableState, count: u64) -> Self {
        Self::new(state.page, state.page_size, count)
    }

    /// Returns the current page.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Number of pages; an empty list still has one (empty) page.
    pub fn total_pages(&self) -> u32 {
        let pages = self.count.div_ceil(u64::from(self.page_size)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Returns `true` if `page` exists.
    pub fn contains(&self, page: u32) -> bool {
        (1..=self.total_pages()).contains(&page)
    }

    /// Clamps `page` into the valid range.
    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages())
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// The next page, or `None` on the last page.
    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then(|| self.page + 1)
    }

    /// The previous page, or `None` on the first page.
    pub fn previous_page(&self) -> Option<u32> {
        self.has_previous().then(|| self.page - 1)
    }

    /// Number of rows the server should return for the current page.
    pub fn rows_on_page(&self) -> u64 {
        if !self.contains(self.page) {
            return 0;
        }
        let before = u64::from(self.page - 1) * u64::from(self.page_size);
        self.count
            .saturating_sub(before)
            .min(u64::from(self.page_size))
    }

    /// 1-based row numbers shown on the current page ("21–40 of 45").
    ///
    /// Returns `None` when the page holds no rows.
    pub fn row_range(&self) -> Option<RangeInclusive<u64>> {
        let rows = self.rows_on_page();
        if rows == 0 {
            return None;
        }
        let first = u64::from(self.page - 1) * u64::from(self.page_size) + 1;
        Some(first..=first + rows - 1)
    }
}
