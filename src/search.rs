use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::warn;

use crate::models::Course;
use crate::store::RecordStore;

pub const MIN_QUERY_CHARS: usize = 3;
pub const QUIET_PERIOD: Duration = Duration::from_millis(500);
pub const MAX_RESULTS: u32 = 10;

/// Search-as-you-type policy, shared by the interactive driver and the
/// search route so both enforce the same minimum length and result cap.
#[derive(Clone, Copy, Debug)]
pub struct SearchPolicy {
    pub min_query_chars: usize,
    pub quiet_period: Duration,
    pub max_results: u32,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            min_query_chars: MIN_QUERY_CHARS,
            quiet_period: QUIET_PERIOD,
            max_results: MAX_RESULTS,
        }
    }
}

impl SearchPolicy {
    /// Queries below the minimum length never reach the store.
    pub fn meets_min_length(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.min_query_chars
    }
}

/// The last published search outcome, tagged with the keystroke generation
/// it belongs to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchState {
    pub generation: u64,
    pub query: String,
    pub hits: Vec<Course>,
}

/// Debounced course search driver.
///
/// Every keystroke advances the generation counter and spawns a task that
/// waits out the quiet period before querying. A task whose generation has
/// been superseded exits without querying, and a response that raced a newer
/// keystroke is dropped before publication, so only the latest query's
/// results ever land in the watch channel. Store failures are logged and
/// published as "no results" rather than surfaced as errors.
pub struct Typeahead {
    store: Arc<dyn RecordStore>,
    policy: SearchPolicy,
    generation: Arc<AtomicU64>,
    tx: Arc<watch::Sender<SearchState>>,
    rx: watch::Receiver<SearchState>,
}

impl Typeahead {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_policy(store, SearchPolicy::default())
    }

    pub fn with_policy(store: Arc<dyn RecordStore>, policy: SearchPolicy) -> Self {
        let (tx, rx) = watch::channel(SearchState::default());
        Self {
            store,
            policy,
            generation: Arc::new(AtomicU64::new(0)),
            tx: Arc::new(tx),
            rx,
        }
    }

    /// Feed the current content of the search box. Short or empty input
    /// clears the results immediately and still invalidates anything
    /// in flight.
    pub fn input(&self, raw: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = raw.trim().to_string();

        if query.chars().count() < self.policy.min_query_chars {
            publish(
                &self.tx,
                SearchState {
                    generation,
                    query,
                    hits: Vec::new(),
                },
            );
            return;
        }

        let store = self.store.clone();
        let counter = self.generation.clone();
        let tx = self.tx.clone();
        let quiet = self.policy.quiet_period;
        let limit = self.policy.max_results;

        tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            if counter.load(Ordering::SeqCst) != generation {
                // superseded while waiting out the quiet period
                return;
            }

            let hits = match store.search_courses(&query, limit).await {
                Ok(hits) => hits,
                Err(err) => {
                    warn!("course search for {:?} failed: {}", query, err);
                    Vec::new()
                }
            };

            if counter.load(Ordering::SeqCst) != generation {
                // a newer keystroke raced this lookup; drop the response
                return;
            }

            publish(
                &tx,
                SearchState {
                    generation,
                    query,
                    hits,
                },
            );
        });
    }

    /// Forget the query and results, e.g. after a course has been picked.
    pub fn reset(&self) {
        self.input("");
    }

    pub fn results(&self) -> Vec<Course> {
        self.rx.borrow().hits.clone()
    }

    pub fn state(&self) -> SearchState {
        self.rx.borrow().clone()
    }

    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    /// Watch the published search state; used by UIs that re-render on
    /// change and by the tests.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.rx.clone()
    }
}

/// Newest-wins publication. The generation comparison runs under the channel
/// lock, so a late result can never overwrite a fresher state, and a refused
/// publication never wakes subscribers.
fn publish(tx: &watch::Sender<SearchState>, next: SearchState) {
    tx.send_if_modified(|current| {
        if next.generation < current.generation {
            return false;
        }
        *current = next;
        true
    });
}
