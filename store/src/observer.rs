use common::Error;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::debug;

/// Pending/success/error state of a query as seen by its subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// Nothing has been requested yet
    Idle,
    Loading,
    Success(T),
    Error(Error),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryState::Error(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Success(data) => Some(data),
            _ => None,
        }
    }
}

/// Publishes the state of the latest run of a query.
///
/// Every call to [`QueryObserver::run`] supersedes the previous one: if an
/// older run finishes after a newer one started, its result is dropped so a
/// stale page or currency never overwrites the current one.
pub struct QueryObserver<T> {
    sender: watch::Sender<QueryState<T>>,
    generation: AtomicU64,
}

impl<T: Clone> Default for QueryObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> QueryObserver<T> {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(QueryState::Idle);
        Self {
            sender,
            generation: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.sender.subscribe()
    }

    pub fn state(&self) -> QueryState<T> {
        self.sender.borrow().clone()
    }

    /// Starts a new run: supersedes any run in flight and publishes
    /// `Loading`. Returns the run's generation for [`QueryObserver::complete`].
    pub fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.sender.send_replace(QueryState::Loading);
        generation
    }

    /// Publishes the outcome of run `generation` unless a later run has
    /// started since. Returns the outcome either way.
    pub fn complete(&self, generation: u64, result: common::Result<T>) -> QueryState<T> {
        let state = match result {
            Ok(data) => QueryState::Success(data),
            Err(err) => QueryState::Error(err),
        };

        if self.generation.load(Ordering::SeqCst) == generation {
            self.sender.send_replace(state.clone());
        } else {
            debug!("Discarding result of superseded query run {}", generation);
        }

        state
    }

    /// Runs `query` to completion as a new run
    pub async fn run<Fut>(&self, query: Fut) -> QueryState<T>
    where
        Fut: Future<Output = common::Result<T>>,
    {
        let generation = self.begin();
        self.complete(generation, query.await)
    }

    /// Settles the query without running anything, superseding any run in
    /// flight. Used when the query is not enabled, e.g. a missing coin id.
    pub fn disable(&self, state: QueryState<T>) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.sender.send_replace(state);
    }
}
