use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Most page-number buttons shown at once.
pub const MAX_PAGE_BUTTONS: u32 = 10;

/// Page sizes offered by table screens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum PageSize {
    Five,
    #[default]
    Ten,
    TwentyFive,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 5] = [
        PageSize::Five,
        PageSize::Ten,
        PageSize::TwentyFive,
        PageSize::Fifty,
        PageSize::Hundred,
    ];

    pub const fn get(self) -> u32 {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }
}

impl TryFrom<u32> for PageSize {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or(value)
    }
}

impl Display for PageSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

fn get_pages(
    total_pages: u32,
    current_page: u32,
    left_edge: u32,
    left_current: u32,
    right_current: u32,
    right_edge: u32,
) -> Vec<Option<u32>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Page-number buttons for a pager; `None` marks an ellipsis.
///
/// Up to [`MAX_PAGE_BUTTONS`] pages are listed in full. Beyond that the first
/// and last page stay visible and the pages around `current_page` fill the
/// rest.
pub fn page_window(total_pages: u32, current_page: u32) -> Vec<Option<u32>> {
    let current_page = current_page.clamp(1, total_pages.max(1));
    if total_pages <= MAX_PAGE_BUTTONS {
        return (1..=total_pages).map(Some).collect();
    }
    get_pages(total_pages, current_page, 1, 3, 4, 1)
}

/// Derived numbers behind the "Showing X–Y of Z" caption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u32,
    pub start_record: u64,
    pub end_record: u64,
}

impl PageSummary {
    /// `page` is 1-based; `page_size` must be positive.
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        let page = page.max(1);
        let size = u64::from(page_size.max(1));
        let total_pages = u32::try_from(total.div_ceil(size)).unwrap_or(u32::MAX);
        let start_record = u64::from(page - 1) * size + 1;
        let end_record = (start_record + size - 1).min(total);

        Self {
            page,
            page_size: page_size.max(1),
            total,
            total_pages,
            start_record,
            end_record,
        }
    }

    pub fn caption(&self) -> String {
        if self.total == 0 {
            return "No records".to_string();
        }
        format!(
            "Showing {}–{} of {}",
            self.start_record, self.end_record, self.total
        )
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}
