//! Search coordinator - main pagination and extraction logic
//!
//! This module runs one search query end to end:
//! - Fetching and parsing the first result page to learn the page count
//! - Fetching the remaining pages through a bounded worker pool
//! - Merging listings from concurrent pages into one collection
//! - Reporting progress and honoring stop requests
//!
//! Stopping is cooperative: pages already handed to a worker finish and keep
//! their listings, pages not yet started are skipped.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::scheduler::WorkerPool;
use crate::site::{Listing, ParsedPage, SiteAdapter};
use crate::state::RunState;
use crate::url::EncodedQuery;
use crate::{FinderError, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Notifications emitted while a search runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEvent {
    /// A page reached its final disposition
    Progress { processed: usize, total: usize },

    /// The run reached a terminal state
    Finished { state: RunState },
}

/// Cloneable handle that requests a running search to stop
#[derive(Debug, Clone)]
pub struct StopHandle {
    token: CancellationToken,
}

impl StopHandle {
    /// Requests a stop; returns immediately
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Returns true once a stop has been requested
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Outcome of one search run
#[derive(Debug)]
pub struct SearchReport {
    /// The query as entered
    pub query: String,

    /// Terminal state of the run
    pub state: RunState,

    /// Result pages announced by the first page (0 when nothing was found)
    pub total_pages: usize,

    /// Pages that reached a final disposition, failed pages included
    pub processed_pages: usize,

    /// Pages whose fetch or parse failed after the first page
    pub failed_pages: usize,

    /// Pages never started because of a stop request
    pub skipped_pages: usize,

    /// Listings from every processed page
    pub listings: Vec<Listing>,

    /// Error that failed the run
    pub error: Option<FinderError>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SearchReport {
    /// Wall-clock duration of the run
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Listings and counters shared between page tasks
#[derive(Default)]
struct Accumulator {
    listings: Vec<Listing>,
    processed: usize,
    failed: usize,
}

/// Per-run state handed to every page task
struct RunContext {
    total_pages: usize,
    accumulator: Mutex<Accumulator>,
    events: Option<mpsc::UnboundedSender<SearchEvent>>,
}

impl RunContext {
    fn new(total_pages: usize, events: Option<mpsc::UnboundedSender<SearchEvent>>) -> Self {
        Self {
            total_pages,
            accumulator: Mutex::new(Accumulator::default()),
            events,
        }
    }

    /// Appends a page's listings and counts the page as processed
    ///
    /// The progress event is sent while the lock is held, so events arrive
    /// in increasing `processed` order.
    async fn merge(&self, listings: Vec<Listing>, failed: bool) {
        let mut accumulator = self.accumulator.lock().await;
        accumulator.listings.extend(listings);
        accumulator.processed += 1;
        if failed {
            accumulator.failed += 1;
        }

        emit(
            &self.events,
            SearchEvent::Progress {
                processed: accumulator.processed,
                total: self.total_pages,
            },
        );
    }

    async fn take(&self) -> Accumulator {
        std::mem::take(&mut *self.accumulator.lock().await)
    }
}

/// Result of `run` before it is stamped into a report
struct RunOutcome {
    state: RunState,
    total_pages: usize,
    accumulator: Accumulator,
    skipped_pages: usize,
    error: Option<FinderError>,
}

impl RunOutcome {
    fn empty(state: RunState, error: Option<FinderError>) -> Self {
        Self {
            state,
            total_pages: 0,
            accumulator: Accumulator::default(),
            skipped_pages: 0,
            error,
        }
    }
}

fn emit(events: &Option<mpsc::UnboundedSender<SearchEvent>>, event: SearchEvent) {
    if let Some(events) = events {
        // A dropped receiver only means nobody is watching progress
        let _ = events.send(event);
    }
}

async fn fetch_and_parse(
    adapter: &dyn SiteAdapter,
    fetcher: &dyn PageFetcher,
    url: &str,
) -> Result<ParsedPage> {
    let body = fetcher.fetch(url).await?;
    adapter.parse_page(&body, url)
}

/// Runs one search query against one site
///
/// A finder is single-use: it starts Idle, `start` moves it through
/// Running into a terminal state, and a second `start` is rejected.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use vacancy_finder::config::Config;
/// use vacancy_finder::crawler::{HttpFetcher, VacancyFinder, WorkerPool};
/// use vacancy_finder::site::HeadHunterAdapter;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let finder = VacancyFinder::new(
///     Arc::new(HeadHunterAdapter::new(&config.site)?),
///     Arc::new(HttpFetcher::new(&config.fetcher)?),
///     WorkerPool::from_config(&config.workers),
/// );
///
/// let report = finder.start("rust developer").await?;
/// println!("{}: {} listings", report.state, report.listings.len());
/// # Ok(())
/// # }
/// ```
pub struct VacancyFinder {
    adapter: Arc<dyn SiteAdapter>,
    fetcher: Arc<dyn PageFetcher>,
    pool: WorkerPool,
    cancel: CancellationToken,
    state: watch::Sender<RunState>,
    events: Option<mpsc::UnboundedSender<SearchEvent>>,
}

impl VacancyFinder {
    /// Creates an idle finder
    pub fn new(
        adapter: Arc<dyn SiteAdapter>,
        fetcher: Arc<dyn PageFetcher>,
        pool: WorkerPool,
    ) -> Self {
        let (state, _) = watch::channel(RunState::Idle);
        Self {
            adapter,
            fetcher,
            pool,
            cancel: CancellationToken::new(),
            state,
            events: None,
        }
    }

    /// Sends progress and completion events to `events`
    pub fn with_progress(mut self, events: mpsc::UnboundedSender<SearchEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Current state of the run
    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    /// Receiver that observes every state change, including the terminal one
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    /// Requests the run to stop without waiting for it
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Handle that can stop the run from another task
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            token: self.cancel.clone(),
        }
    }

    fn transition(&self, next: RunState) -> Result<()> {
        let mut result = Ok(());
        self.state.send_if_modified(|current| {
            if current.can_transition_to(next) {
                *current = next;
                true
            } else {
                result = Err(FinderError::InvalidTransition {
                    from: *current,
                    to: next,
                });
                false
            }
        });
        result
    }

    /// Runs the search for `query` (not yet percent-encoded) to completion
    ///
    /// # Returns
    ///
    /// * `Ok(SearchReport)` - The run reached a terminal state; check `state`
    /// * `Err(FinderError::InvalidTransition)` - The finder was already started
    pub async fn start(&self, query: &str) -> Result<SearchReport> {
        self.transition(RunState::Running)?;
        let started_at = Utc::now();
        tracing::info!("Searching {} for {:?}", self.adapter.name(), query);

        let outcome = self.run(query).await;

        self.transition(outcome.state)?;
        emit(
            &self.events,
            SearchEvent::Finished {
                state: outcome.state,
            },
        );

        let report = SearchReport {
            query: query.to_string(),
            state: outcome.state,
            total_pages: outcome.total_pages,
            processed_pages: outcome.accumulator.processed,
            failed_pages: outcome.accumulator.failed,
            skipped_pages: outcome.skipped_pages,
            listings: outcome.accumulator.listings,
            error: outcome.error,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Search for {:?} {}: {} listings from {}/{} pages ({} failed, {} skipped) in {}ms",
            report.query,
            report.state,
            report.listings.len(),
            report.processed_pages,
            report.total_pages,
            report.failed_pages,
            report.skipped_pages,
            report.duration().num_milliseconds()
        );

        Ok(report)
    }

    async fn run(&self, query: &str) -> RunOutcome {
        let encoded = EncodedQuery::encode(query);
        let mut urls = self.adapter.page_urls(&encoded);

        if self.cancel.is_cancelled() {
            tracing::info!("Search stopped before the first page");
            return RunOutcome::empty(RunState::Cancelled, None);
        }

        let Some(first_url) = urls.next() else {
            return RunOutcome::empty(RunState::Completed, None);
        };

        let first_page =
            match fetch_and_parse(self.adapter.as_ref(), self.fetcher.as_ref(), &first_url).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!("First result page {} failed: {}", first_url, e);
                    return RunOutcome::empty(RunState::Failed, Some(e));
                }
            };

        let total_pages = first_page.total_pages.unwrap_or(0);
        if total_pages == 0 {
            tracing::info!("No results for {:?}", query);
            return RunOutcome::empty(RunState::Completed, None);
        }
        tracing::debug!(
            "{} result pages, {} listings on the first",
            total_pages,
            first_page.listings.len()
        );

        let context = Arc::new(RunContext::new(total_pages, self.events.clone()));
        context.merge(first_page.listings, false).await;

        let skipped_pages = self
            .process_remaining(urls.take(total_pages - 1), &context)
            .await;

        let state = if skipped_pages > 0 {
            RunState::Cancelled
        } else {
            RunState::Completed
        };

        RunOutcome {
            state,
            total_pages,
            accumulator: context.take().await,
            skipped_pages,
            error: None,
        }
    }

    /// Fetches pages 1.. concurrently and returns how many were skipped
    ///
    /// A page that fails is logged and counted, and the run goes on.
    async fn process_remaining(
        &self,
        urls: impl Iterator<Item = String>,
        context: &Arc<RunContext>,
    ) -> usize {
        let mut tasks = JoinSet::new();
        let mut skipped = 0;

        for (offset, url) in urls.enumerate() {
            let page = offset + 1;

            let permit = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                permit = self.pool.acquire() => permit,
            };

            let Some(permit) = permit.filter(|_| !self.cancel.is_cancelled()) else {
                tracing::debug!("Skipping page {} after stop request", page);
                skipped += 1;
                continue;
            };

            let adapter = Arc::clone(&self.adapter);
            let fetcher = Arc::clone(&self.fetcher);
            let context = Arc::clone(context);

            tasks.spawn(async move {
                let _permit = permit;
                match fetch_and_parse(adapter.as_ref(), fetcher.as_ref(), &url).await {
                    Ok(parsed) => {
                        tracing::debug!(
                            "Page {}/{}: {} listings",
                            page + 1,
                            context.total_pages,
                            parsed.listings.len()
                        );
                        context.merge(parsed.listings, false).await;
                    }
                    Err(e) => {
                        tracing::warn!("Skipping result page {} ({}): {}", page, url, e);
                        context.merge(Vec::new(), true).await;
                    }
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Page task did not finish: {}", e);
                context.merge(Vec::new(), true).await;
            }
        }

        skipped
    }
}
