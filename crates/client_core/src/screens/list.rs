//! Paginated list with a create mutation.
//!
//! A successful create moves pagination back to page one and refetches the
//! list at that page. A failed create leaves the current list, page and create
//! surface as they were, with the failure readable from the create controller.

use std::num::NonZeroU64;

use async_trait::async_trait;
use shared::{
    domain::Keyed,
    protocol::{ListQuery, PaginatedResponse},
};
use tracing::{error, info, warn};

use crate::{
    error::ClientError,
    pagination::{PageWindow, PaginationCoordinator},
    resource::ResourceController,
};

/// Where a list screen reads pages from and sends creates to.
#[async_trait]
pub trait ListSource: Send + Sync {
    type Item: Keyed + Clone + Send + Sync + 'static;
    type Draft: Send;

    /// Short noun used in log lines, e.g. `"samples"`.
    fn label(&self) -> &'static str;

    async fn fetch_page(
        &self,
        query: ListQuery,
    ) -> Result<PaginatedResponse<Self::Item>, ClientError>;

    async fn create(&self, draft: Self::Draft) -> Result<Self::Item, ClientError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Viewing,
    Mutating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView<T> {
    /// First load, nothing to show yet.
    Loading,
    /// Loading failed and there is no earlier page to fall back on.
    Failed { message: String },
    Ready {
        items: Vec<T>,
        refreshing: bool,
        page: PageWindow,
    },
}

pub struct ListScreen<S: ListSource> {
    source: S,
    pagination: PaginationCoordinator,
    fetch: ResourceController<PaginatedResponse<S::Item>>,
    create: ResourceController<S::Item>,
    phase: ListPhase,
    create_open: bool,
}

impl<S: ListSource> ListScreen<S> {
    pub fn new(source: S, items_per_page: NonZeroU64) -> Self {
        let label = source.label();
        let fetch = ResourceController::new("list-fetch").with_on_error(move |message| {
            error!(list = label, "failed to load {label}: {message}");
        });
        let create = ResourceController::new("list-create").with_on_error(move |message| {
            error!(list = label, "failed to create entry in {label}: {message}");
        });
        Self {
            source,
            pagination: PaginationCoordinator::new(items_per_page),
            fetch,
            create,
            phase: ListPhase::Viewing,
            create_open: false,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn pagination(&self) -> &PaginationCoordinator {
        &self.pagination
    }

    pub fn fetch_controller(&self) -> &ResourceController<PaginatedResponse<S::Item>> {
        &self.fetch
    }

    pub fn create_controller(&self) -> &ResourceController<S::Item> {
        &self.create
    }

    pub fn phase(&self) -> ListPhase {
        self.phase
    }

    pub fn items(&self) -> Vec<S::Item> {
        self.fetch
            .with_data(|page| page.map(|page| page.results.clone()).unwrap_or_default())
    }

    pub fn item_keys(&self) -> Vec<<S::Item as Keyed>::Key> {
        self.fetch.with_data(|page| {
            page.map(|page| page.results.iter().map(|item| item.key()).collect())
                .unwrap_or_default()
        })
    }

    pub fn view(&self) -> ListView<S::Item> {
        let state = self.fetch.snapshot();
        let pending = state.is_pending();
        match (state.data, state.error) {
            (None, _) if pending => ListView::Loading,
            (None, Some(message)) => ListView::Failed { message },
            (data, _) => ListView::Ready {
                items: data.map(|page| page.results).unwrap_or_default(),
                refreshing: pending,
                page: self.pagination.window(),
            },
        }
    }

    /// Fetches the current page and feeds its total back into pagination.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let query = self.pagination.query();
        let source = &self.source;
        let page = self.fetch.execute(|| source.fetch_page(query)).await?;
        self.pagination.set_total_count(page.total_count);
        Ok(())
    }

    pub async fn retry(&mut self) -> Result<(), ClientError> {
        self.load().await
    }

    /// Moves to `page` and refetches when the page actually changed.
    pub async fn go_to_page(&mut self, page: u64) -> Result<bool, ClientError> {
        let moved = self.pagination.set_current_page(page);
        self.refetch_if(moved).await
    }

    pub async fn next_page(&mut self) -> Result<bool, ClientError> {
        let moved = self.pagination.next_page();
        self.refetch_if(moved).await
    }

    pub async fn previous_page(&mut self) -> Result<bool, ClientError> {
        let moved = self.pagination.previous_page();
        self.refetch_if(moved).await
    }

    pub async fn first_page(&mut self) -> Result<bool, ClientError> {
        let moved = self.pagination.go_to_first_page();
        self.refetch_if(moved).await
    }

    pub async fn last_page(&mut self) -> Result<bool, ClientError> {
        let moved = self.pagination.go_to_last_page();
        self.refetch_if(moved).await
    }

    async fn refetch_if(&mut self, moved: bool) -> Result<bool, ClientError> {
        if moved {
            self.load().await?;
        }
        Ok(moved)
    }

    pub fn is_create_open(&self) -> bool {
        self.create_open
    }

    pub fn open_create(&mut self) {
        self.create_open = true;
    }

    pub fn close_create(&mut self) {
        self.create_open = false;
    }

    /// Runs the create mutation; on success closes the create surface, returns
    /// to page one and refetches. A failed refetch is logged and left on the
    /// fetch controller; the create itself still counts as done.
    pub async fn submit_create(&mut self, draft: S::Draft) -> Result<S::Item, ClientError> {
        let outcome = {
            let _mutating = MutatingPhase::enter(&mut self.phase);
            let source = &self.source;
            self.create.execute(|| source.create(draft)).await
        };
        let created = outcome?;

        info!(list = self.source.label(), "created entry, refetching first page");
        self.create_open = false;
        self.pagination.go_to_first_page();
        if let Err(err) = self.load().await {
            warn!(list = self.source.label(), "refetch after create failed: {err}");
        }
        Ok(created)
    }
}

/// Holds the list in `Mutating` for one create and puts it back to `Viewing`
/// when dropped, whether the create settled or was abandoned.
struct MutatingPhase<'a> {
    phase: &'a mut ListPhase,
}

impl<'a> MutatingPhase<'a> {
    fn enter(phase: &'a mut ListPhase) -> Self {
        *phase = ListPhase::Mutating;
        Self { phase }
    }
}

impl Drop for MutatingPhase<'_> {
    fn drop(&mut self) {
        *self.phase = ListPhase::Viewing;
    }
}

#[cfg(test)]
#[path = "../tests/list_tests.rs"]
mod tests;
