//! Session state and the trigger surface.
//!
//! [`ScheduleController`] owns the cached aggregated list and is the only
//! writer to it. Presenters (the CLI and the HTTP API) call
//! [`ScheduleController::on_load_requested`] and
//! [`ScheduleController::on_day_selected`] and display the returned [`View`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate::Aggregator;
use crate::models::{DayCode, Item, RenderedRecord};
use crate::schedule::project_day;

/// What the presenter should display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    /// A load is in flight; show the busy indicator and keep the load trigger disabled.
    Busy,
    /// Cards for one day, in schedule order.
    Cards {
        day: DayCode,
        cards: Vec<RenderedRecord>,
    },
    /// Loading succeeded but every resource was empty.
    NoDataFound,
    /// Loading failed. `message` is the underlying error.
    LoadError { message: String },
    /// Nothing has been loaded yet.
    NoDataLoaded,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => f.write_str("Loading..."),
            Self::Cards { day, cards } => write!(f, "Day {}: {} blocks", day, cards.len()),
            Self::NoDataFound => f.write_str("No data found."),
            Self::LoadError { message } => write!(f, "Error loading data: {}", message),
            Self::NoDataLoaded => f.write_str("No data loaded yet. Click \"Load Data\"."),
        }
    }
}

/// Lifecycle of the session's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No load has completed yet.
    Empty,
    /// An aggregation is in flight.
    Loading,
    /// Data is cached and projectable.
    Ready,
    /// The most recent load failed. A previously cached list may still be present.
    Failed,
}

/// Point-in-time summary of the session, for status endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub phase: Phase,
    pub selected_day: DayCode,
    /// Length of the cached list, `None` if nothing was ever loaded.
    pub item_count: Option<usize>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

struct ScheduleState {
    items: Option<Arc<[Item]>>,
    loaded_at: Option<DateTime<Utc>>,
    selected_day: DayCode,
    phase: Phase,
    last_error: Option<String>,
}

impl ScheduleState {
    fn new(initial_day: DayCode) -> Self {
        Self {
            items: None,
            loaded_at: None,
            selected_day: initial_day,
            phase: Phase::Empty,
            last_error: None,
        }
    }
}

/// Marks a load as in flight for as long as it is held.
///
/// Acquiring moves the phase to `Loading`. If the load future is dropped
/// before [`LoadGuard::finish`] records an outcome, the previous phase is put
/// back. The in-flight flag is cleared on every path.
struct LoadGuard<'a> {
    in_flight: &'a AtomicBool,
    state: &'a RwLock<ScheduleState>,
    prior: Option<Phase>,
}

impl<'a> LoadGuard<'a> {
    fn acquire(in_flight: &'a AtomicBool, state: &'a RwLock<ScheduleState>) -> Option<Self> {
        in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        let mut guard = Self {
            in_flight,
            state,
            prior: None,
        };
        let mut state = state.write().expect("schedule state lock poisoned");
        guard.prior = Some(std::mem::replace(&mut state.phase, Phase::Loading));
        drop(state);
        Some(guard)
    }

    /// The load reached `Ready` or `Failed`; keep that phase on drop.
    fn finish(&mut self) {
        self.prior = None;
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if let Some(prior) = self.prior.take() {
            if let Ok(mut state) = self.state.write() {
                if state.phase == Phase::Loading {
                    tracing::warn!(phase = ?prior, "load cancelled before completion");
                    state.phase = prior;
                }
            }
        }
        self.in_flight.store(false, Ordering::Release);
    }
}

/// Owns the session state and runs loads and projections against it.
///
/// Cloning is cheap and clones share state.
#[derive(Clone)]
pub struct ScheduleController {
    aggregator: Arc<Aggregator>,
    state: Arc<RwLock<ScheduleState>>,
    in_flight: Arc<AtomicBool>,
}

impl ScheduleController {
    pub fn new(aggregator: Aggregator, initial_day: DayCode) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            state: Arc::new(RwLock::new(ScheduleState::new(initial_day))),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ScheduleState> {
        self.state.read().expect("schedule state lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, ScheduleState> {
        self.state.write().expect("schedule state lock poisoned")
    }

    /// Run one aggregation and publish its result.
    ///
    /// At most one load runs at a time; a trigger that arrives while a load is
    /// in flight is ignored and answered with [`View::Busy`]. On failure the
    /// previously cached list, if any, is kept.
    pub async fn on_load_requested(&self) -> View {
        let Some(mut guard) = LoadGuard::acquire(&self.in_flight, &self.state) else {
            tracing::warn!("load requested while another load is in flight; ignoring");
            return View::Busy;
        };

        tracing::info!(
            resources = self.aggregator.locators().len(),
            "loading schedule data"
        );

        match self.aggregator.aggregate().await {
            Ok(items) => {
                let items: Arc<[Item]> = items.into();
                let day = {
                    let mut state = self.write();
                    state.items = Some(Arc::clone(&items));
                    state.loaded_at = Some(Utc::now());
                    state.phase = Phase::Ready;
                    state.last_error = None;
                    state.selected_day
                };
                guard.finish();
                tracing::info!(items = items.len(), day = %day, "schedule data loaded");
                cached_view(day, Some(&items[..]))
            }
            Err(e) => {
                tracing::error!(locator = %e.locator(), "failed to load schedule data: {}", e);
                let message = e.to_string();
                let mut state = self.write();
                state.phase = Phase::Failed;
                state.last_error = Some(message.clone());
                drop(state);
                guard.finish();
                View::LoadError { message }
            }
        }
    }

    /// Select a day and project the cached list for it.
    ///
    /// Unrecognized codes select the default day. Never re-fetches.
    ///
    /// After a failed load, selecting a day leaves the error view: the phase
    /// becomes `Ready` if an older list is still cached, `Empty` otherwise.
    /// `last_error` stays in the status until the next successful load.
    pub fn on_day_selected(&self, day: &str) -> View {
        let day = DayCode::resolve(day);
        let items = {
            let mut state = self.write();
            state.selected_day = day;
            if state.phase == Phase::Failed {
                state.phase = if state.items.is_some() {
                    Phase::Ready
                } else {
                    Phase::Empty
                };
            }
            state.items.clone()
        };
        tracing::debug!(day = %day, "day selected");
        cached_view(day, items.as_deref())
    }

    /// The view for the currently selected day, reflecting an in-flight or failed load.
    pub fn current_view(&self) -> View {
        let (phase, day, items, last_error) = {
            let state = self.read();
            (
                state.phase,
                state.selected_day,
                state.items.clone(),
                state.last_error.clone(),
            )
        };
        match phase {
            Phase::Loading => View::Busy,
            Phase::Failed => View::LoadError {
                message: last_error.unwrap_or_default(),
            },
            Phase::Empty | Phase::Ready => cached_view(day, items.as_deref()),
        }
    }

    /// Project the cached list for `day` without changing the selection.
    pub fn preview_day(&self, day: &str) -> View {
        let items = self.read().items.clone();
        cached_view(DayCode::resolve(day), items.as_deref())
    }

    /// The cached aggregated list, if a load has ever succeeded.
    pub fn items(&self) -> Option<Arc<[Item]>> {
        self.read().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn status(&self) -> StatusSnapshot {
        let state = self.read();
        StatusSnapshot {
            phase: state.phase,
            selected_day: state.selected_day,
            item_count: state.items.as_ref().map(|items| items.len()),
            loaded_at: state.loaded_at,
            last_error: state.last_error.clone(),
        }
    }
}

/// Projection is only attempted on a non-empty cached list.
fn cached_view(day: DayCode, items: Option<&[Item]>) -> View {
    match items {
        None => View::NoDataLoaded,
        Some([]) => View::NoDataFound,
        Some(items) => View::Cards {
            day,
            cards: project_day(day, items),
        },
    }
}
