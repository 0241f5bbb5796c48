//! Everything a table screen renders, computed in one place.

use serde::Serialize;

use crate::controller::notify::Notification;
use crate::controller::sort::SortState;
use crate::pagination::PageSummary;

/// Snapshot of one table screen.
#[derive(Clone, Debug, Serialize)]
pub struct ListView<E, C> {
    /// Resource label, e.g. `Zone`.
    pub title: &'static str,
    pub rows: Vec<E>,
    pub summary: PageSummary,
    /// "Showing X–Y of Z".
    pub caption: String,
    /// Page-number buttons; `None` renders as an ellipsis.
    pub pages: Vec<Option<u32>>,
    pub page_size: u32,
    pub page_sizes: Vec<u32>,
    /// Text currently in the search box, not yet necessarily applied.
    pub search: String,
    pub sort: Option<SortState<C>>,
    /// Rows are ordered on the client, so the order only holds inside the
    /// current page.
    pub sorted_within_page: bool,
    pub is_loading: bool,
    pub is_submitting: bool,
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_approve: bool,
    pub notifications: Vec<Notification>,
    /// Inline `(field, message)` errors of the open form.
    pub form_errors: Vec<(String, String)>,
}

impl<E, C> ListView<E, C> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
