//! Paged, filterable job list.
//!
//! Every fetch snapshots the `(page, filters)` it was issued for, plus a
//! dispatch counter. A completion only commits while that snapshot still
//! matches the controller and no newer fetch was issued, so overlapping
//! requests can finish in any order without an older response overwriting
//! a newer one.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use anywork_models::{Job, JobFilters};
use anywork_services::JobService;

struct JobListState {
    items: Vec<Job>,
    total_count: u64,
    has_next: bool,
    has_previous: bool,
    page: u32,
    filters: JobFilters,
    loading: bool,
    error: Option<String>,
    /// Bumped on every dispatch; only the newest fetch commits.
    generation: u64,
}

/// Controller for the public job board.
pub struct JobList {
    service: JobService,
    state: Mutex<JobListState>,
}

impl JobList {
    pub fn new(service: JobService) -> Self {
        Self {
            service,
            state: Mutex::new(JobListState {
                items: Vec::new(),
                total_count: 0,
                has_next: false,
                has_previous: false,
                page: 1,
                filters: JobFilters::default(),
                loading: false,
                error: None,
                generation: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, JobListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue the fetch for the current `(page, filters)` and commit the
    /// response unless the parameters moved on while it was in flight.
    async fn fetch(&self) {
        let (page, filters, generation) = {
            let mut state = self.lock();
            state.generation += 1;
            state.loading = true;
            state.error = None;
            (state.page, state.filters.clone(), state.generation)
        };

        let result = self.service.list_jobs(page, &filters).await;

        let mut state = self.lock();
        if state.generation != generation || state.page != page || state.filters != filters {
            debug!("Discarding stale job page response for page {}", page);
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

    /// Re-fetch the current page without touching pagination.
    pub async fn refresh(&self) {
        self.fetch().await;
    }

    /// Replace the filters wholesale and restart from page 1. A stale page
    /// number must never be combined with new filters.
    pub async fn update_filters(&self, filters: JobFilters) {
        {
            let mut state = self.lock();
            state.filters = filters;
            state.page = 1;
        }
        self.fetch().await;
    }

    /// Merge a free-text search into the existing filters, restarting from
    /// page 1.
    pub async fn search(&self, query: &str) {
        {
            let mut state = self.lock();
            state.filters.search = Some(query.to_string());
            state.page = 1;
        }
        self.fetch().await;
    }

    /// Drop all filters and restart from page 1.
    pub async fn clear_filters(&self) {
        self.update_filters(JobFilters::default()).await;
    }

    /// Advance one page. No-op when the server reported no next page.
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

    /// Step back one page. No-op when the server reported no previous
    /// page; the page number never drops below 1.
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

    pub fn jobs(&self) -> Vec<Job> {
        self.lock().items.clone()
    }

    pub fn total_count(&self) -> u64 {
        self.lock().total_count
    }

    pub fn page(&self) -> u32 {
        self.lock().page
    }

    pub fn filters(&self) -> JobFilters {
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
