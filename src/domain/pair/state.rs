//! Pair table state container — app-owned, SDK-provided update logic.

use super::engine::{compute_page_with_prefix, PageState, PageView};
use super::{PairCollection, SortField, SortSpec};
use crate::config::TableConfig;
use crate::error::SdkError;

/// A paginated, sortable pair table.
///
/// The app owns instances of this type (e.g. inside a UI signal) and feeds it
/// whole collections; the table keeps the page cursor consistent with them.
#[derive(Debug, Clone)]
pub struct PairTable {
    link_prefix: String,
    sort: SortSpec,
    page: PageState,
    collection: Option<PairCollection>,
}

impl PairTable {
    pub fn new(config: TableConfig) -> Result<Self, SdkError> {
        config.validate()?;
        Ok(Self {
            link_prefix: config.link_prefix,
            sort: config.sort,
            page: PageState::new(config.page_size),
            collection: None,
        })
    }

    /// Supply a collection.
    ///
    /// A collection with a new identity (a new fetch) resets to page 1. In
    /// both cases `max_page` is recomputed before this returns, so the cursor
    /// is never out of range for the data it will be rendered with.
    pub fn set_collection(&mut self, collection: PairCollection) {
        let is_new = self
            .collection
            .as_ref()
            .map_or(true, |current| current.id() != collection.id());

        if is_new {
            tracing::debug!(
                pairs = collection.len(),
                eligible = collection.eligible_count(),
                "New pair collection, resetting to first page"
            );
            self.page.reset();
        }
        self.page.recompute(collection.eligible_count());
        self.collection = Some(collection);
    }

    /// Drop the current collection (e.g. while a refetch is in flight).
    pub fn clear_collection(&mut self) {
        self.collection = None;
        self.page.reset();
        self.page.recompute(0);
    }

    pub fn collection(&self) -> Option<&PairCollection> {
        self.collection.as_ref()
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    /// Change the sort. The page cursor is kept.
    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    /// Header click: flip direction on the active field, otherwise switch field.
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort = self.sort.toggled(field);
    }

    pub fn page(&self) -> PageState {
        self.page
    }

    /// Change the page size; `max_page` is recomputed and the cursor clamped.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), SdkError> {
        if page_size == 0 {
            return Err(SdkError::Config("page_size must be greater than zero".into()));
        }
        self.page.set_page_size(page_size);
        self.page.recompute(self.eligible_count());
        Ok(())
    }

    pub fn prev_page(&mut self) {
        self.page.prev();
    }

    pub fn next_page(&mut self) {
        self.page.next();
    }

    pub fn eligible_count(&self) -> usize {
        self.collection
            .as_ref()
            .map(PairCollection::eligible_count)
            .unwrap_or(0)
    }

    /// The current page, or `None` until a collection has been supplied.
    pub fn view(&self) -> Option<PageView> {
        self.collection
            .as_ref()
            .map(|c| compute_page_with_prefix(c, self.sort, &self.page, &self.link_prefix))
    }
}

impl Default for PairTable {
    fn default() -> Self {
        Self {
            link_prefix: TableConfig::default().link_prefix,
            sort: SortSpec::default(),
            page: PageState::default(),
            collection: None,
        }
    }
}
