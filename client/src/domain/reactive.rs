//! Dependency-keyed view state for data loaders.
//!
//! A [`ReactiveView`] remembers the dependency value (current user id, route
//! project id, or `()` for unkeyed lists) it last fetched for and the one most
//! recently requested. Each fetch holds a [`FetchTicket`] stamped with a
//! generation; a newer dependency starts its own fetch and bumps the
//! generation, so a slower fetch for the previous value cannot overwrite it.
//! A view is never half-populated.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Result of asking a loader to (re)load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Fresh data was committed.
    Loaded,
    /// The dependency is unchanged, so nothing was fetched.
    Unchanged,
    /// No dependency value is available yet, so nothing was fetched.
    Skipped,
    /// A fetch for the same dependency is already running.
    Busy,
    /// A newer dependency was requested while fetching; the result was dropped.
    Superseded,
    /// The addressed record does not exist; the view is empty.
    NotFound,
    /// A read failed; the view is empty.
    Failed,
}

#[derive(Debug)]
struct State<K, V> {
    loaded: Option<K>,
    requested: Option<K>,
    generation: u64,
    view: V,
}

/// View model plus the dependency it was loaded for.
#[derive(Debug)]
pub struct ReactiveView<K, V> {
    state: Mutex<State<K, V>>,
    in_flight: AtomicUsize,
}

impl<K, V: Default> Default for ReactiveView<K, V> {
    fn default() -> Self {
        Self {
            state: Mutex::new(State {
                loaded: None,
                requested: None,
                generation: 0,
                view: V::default(),
            }),
            in_flight: AtomicUsize::new(0),
        }
    }
}

/// One running fetch. Dropping it ends the fetch.
#[derive(Debug)]
#[must_use = "the fetch ends as soon as the ticket is dropped"]
pub struct FetchTicket<'a, K, V> {
    owner: &'a ReactiveView<K, V>,
    dependency: K,
    generation: u64,
}

impl<K, V> FetchTicket<'_, K, V> {
    /// Dependency this fetch was started for.
    #[must_use]
    pub const fn dependency(&self) -> &K {
        &self.dependency
    }
}

impl<K, V> Drop for FetchTicket<'_, K, V> {
    fn drop(&mut self) {
        let mut state = self.owner.lock();
        if state.generation == self.generation {
            state.requested = None;
        }
        drop(state);
        self.owner.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

impl<K, V> ReactiveView<K, V> {
    fn lock(&self) -> MutexGuard<'_, State<K, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> ReactiveView<K, V>
where
    K: Clone + PartialEq,
    V: Clone + Default,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn start(&self, state: &mut State<K, V>, dependency: K) -> FetchTicket<'_, K, V> {
        state.generation += 1;
        state.requested = Some(dependency.clone());
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        FetchTicket {
            owner: self,
            dependency,
            generation: state.generation,
        }
    }

    /// Whether `dependency` differs from the one last loaded or requested.
    #[must_use]
    pub fn is_stale(&self, dependency: &K) -> bool {
        let state = self.lock();
        state.requested.as_ref().or(state.loaded.as_ref()) != Some(dependency)
    }

    /// Start a fetch for `dependency`.
    ///
    /// A dependency that differs from the latest requested one always starts
    /// a fetch and supersedes any fetch still running.
    ///
    /// # Errors
    ///
    /// Returns [`LoadStatus::Unchanged`] when `dependency` is already loaded
    /// and [`LoadStatus::Busy`] when a fetch for it is running.
    pub fn begin(&self, dependency: &K) -> Result<FetchTicket<'_, K, V>, LoadStatus> {
        let mut state = self.lock();
        if state.requested.as_ref() == Some(dependency) {
            return Err(LoadStatus::Busy);
        }
        if state.requested.is_none() && state.loaded.as_ref() == Some(dependency) {
            return Err(LoadStatus::Unchanged);
        }
        Ok(self.start(&mut state, dependency.clone()))
    }

    /// Start a fetch for the dependency already loaded.
    ///
    /// # Errors
    ///
    /// Returns [`LoadStatus::Busy`] while a fetch is running and
    /// [`LoadStatus::Skipped`] before anything was loaded.
    pub fn begin_refresh(&self) -> Result<FetchTicket<'_, K, V>, LoadStatus> {
        let mut state = self.lock();
        if state.requested.is_some() {
            return Err(LoadStatus::Busy);
        }
        let dependency = state.loaded.clone().ok_or(LoadStatus::Skipped)?;
        Ok(self.start(&mut state, dependency))
    }

    /// Store a complete view for the ticket's dependency.
    ///
    /// Returns `false`, leaving the view untouched, when a newer fetch has
    /// started since the ticket was issued.
    #[must_use = "a superseded fetch must not report fresh data"]
    pub fn commit(&self, ticket: &FetchTicket<'_, K, V>, view: V) -> bool {
        let mut state = self.lock();
        if state.generation != ticket.generation {
            return false;
        }
        state.view = view;
        state.loaded = Some(ticket.dependency.clone());
        state.requested = None;
        true
    }

    /// Reset to the empty view while remembering the ticket's dependency.
    ///
    /// Returns `false` when the ticket was superseded.
    #[must_use = "a superseded fetch must not report a failure"]
    pub fn clear(&self, ticket: &FetchTicket<'_, K, V>) -> bool {
        self.commit(ticket, V::default())
    }

    /// Snapshot of the current view.
    #[must_use]
    pub fn view(&self) -> V {
        self.lock().view.clone()
    }

    /// The dependency the current view was loaded for.
    #[must_use]
    pub fn dependency(&self) -> Option<K> {
        self.lock().loaded.clone()
    }

    /// True while any fetch is running.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) > 0
    }
}
