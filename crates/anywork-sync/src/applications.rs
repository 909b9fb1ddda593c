//! Paged application list with status and delete actions.
//!
//! Pagination and stale-response handling mirror the job list: a fetch
//! snapshots its parameters and dispatch counter, and only the newest
//! matching fetch commits. Status updates and deletes report their own
//! outcome and trigger a refetch on success so the list reflects the
//! server.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use anywork_models::{Application, ApplicationFilters, ApplicationId, ApplicationStatus};
use anywork_services::ApplicationService;

/// Result of a mutate-then-refetch action, for surfacing in a UI.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl ActionOutcome {
    fn succeeded() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }
}

struct ApplicationListState {
    items: Vec<Application>,
    total_count: u64,
    has_next: bool,
    has_previous: bool,
    page: u32,
    filters: ApplicationFilters,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

/// Controller for an application inbox, employer or job seeker side.
pub struct ApplicationList {
    service: ApplicationService,
    state: Mutex<ApplicationListState>,
}

impl ApplicationList {
    pub fn new(service: ApplicationService) -> Self {
        Self {
            service,
            state: Mutex::new(ApplicationListState {
                items: Vec::new(),
                total_count: 0,
                has_next: false,
                has_previous: false,
                page: 1,
                filters: ApplicationFilters::default(),
                loading: false,
                error: None,
                generation: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ApplicationListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn fetch(&self) {
        let (page, filters, generation) = {
            let mut state = self.lock();
            state.generation += 1;
            state.loading = true;
            state.error = None;
            (state.page, state.filters.clone(), state.generation)
        };

        let result = self.service.list_applications(page, &filters).await;

        let mut state = self.lock();
        if state.generation != generation || state.page != page || state.filters != filters {
            debug!(
                "Discarding stale application page response for page {}",
                page
            );
            return;
        }
        state.loading = false;

        match result {
            Ok(page_data) => {
                state.items = page_data.results;
                state.total_count = page_data.count;
                state.has_next = page_data.next.is_some();
                state.has_previous = page_data.previous.is_some();
            }
            Err(e) => {
                state.error = Some(e.to_string());
            }
        }
    }

    pub async fn refresh(&self) {
        self.fetch().await;
    }

    /// Replace the filters wholesale and restart from page 1.
    pub async fn update_filters(&self, filters: ApplicationFilters) {
        {
            let mut state = self.lock();
            state.filters = filters;
            state.page = 1;
        }
        self.fetch().await;
    }

    pub async fn clear_filters(&self) {
        self.update_filters(ApplicationFilters::default()).await;
    }

    pub async fn next_page(&self) {
        {
            let mut state = self.lock();
            if !state.has_next {
                return;
            }
            state.page += 1;
        }
        self.fetch().await;
    }

    pub async fn previous_page(&self) {
        {
            let mut state = self.lock();
            if !state.has_previous {
                return;
            }
            state.page = state.page.saturating_sub(1).max(1);
        }
        self.fetch().await;
    }

    /// Move an application to a new status, then refetch the current page
    /// so server-side ordering and counts stay authoritative.
    pub async fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> ActionOutcome {
        match self.service.update_status(id, status).await {
            Ok(_) => {
                self.refresh().await;
                ActionOutcome::succeeded()
            }
            Err(e) => ActionOutcome::failed(e.to_string()),
        }
    }

    /// Withdraw or remove an application, then refetch on success.
    pub async fn delete_application(&self, id: &ApplicationId) -> ActionOutcome {
        match self.service.delete_application(id).await {
            Ok(()) => {
                self.refresh().await;
                ActionOutcome::succeeded()
            }
            Err(e) => ActionOutcome::failed(e.to_string()),
        }
    }

    pub fn applications(&self) -> Vec<Application> {
        self.lock().items.clone()
    }

    pub fn total_count(&self) -> u64 {
        self.lock().total_count
    }

    pub fn page(&self) -> u32 {
        self.lock().page
    }

    pub fn filters(&self) -> ApplicationFilters {
        self.lock().filters.clone()
    }

    pub fn has_next(&self) -> bool {
        self.lock().has_next
    }

    pub fn has_previous(&self) -> bool {
        self.lock().has_previous
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }
}
