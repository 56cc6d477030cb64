//! Tri-state async load results with stale-result protection.
//!
//! An [`AsyncResource`] is the value a view reads: pending, ready with
//! data, or ready with an error. A [`ResourceCell`] holds the current
//! resource behind a monotonically increasing generation counter: every
//! launch captures the generation at begin time, and a completion is
//! applied only if that generation is still current. Superseded
//! operations are never interrupted, only ignored when they settle
//! (cooperative cancellation), so results apply last-write-wins by
//! trigger identity rather than by completion order.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::Mutex;
use tracing::debug;

/// A load result in exactly one of three states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncResource<T, E> {
    Pending,
    Ready(T),
    ReadyError(E),
}

impl<T, E> AsyncResource<T, E> {
    pub fn is_pending(&self) -> bool {
        matches!(self, AsyncResource::Pending)
    }

    /// Settled, in either outcome.
    pub fn is_ready(&self) -> bool {
        !self.is_pending()
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, AsyncResource::Ready(_))
    }

    pub fn is_err(&self) -> bool {
        matches!(self, AsyncResource::ReadyError(_))
    }

    pub fn ok(&self) -> Option<&T> {
        match self {
            AsyncResource::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn err(&self) -> Option<&E> {
        match self {
            AsyncResource::ReadyError(err) => Some(err),
            _ => None,
        }
    }
}

impl<T, E> From<Result<T, E>> for AsyncResource<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => AsyncResource::Ready(data),
            Err(err) => AsyncResource::ReadyError(err),
        }
    }
}

/// How a completed (or skipped) load interacted with the cell.
///
/// `Stale` is deliberately not an error: a superseded result is dropped
/// by design and must stay distinguishable from a real failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result was applied to the cell.
    Applied,
    /// The result belonged to a superseded launch and was discarded.
    Stale,
    /// Nothing was launched; the trigger (or upstream) had not changed.
    Unchanged,
}

/// Capture of the cell generation at launch time.
#[derive(Debug, Clone, Copy)]
pub struct LoadTicket {
    generation: u64,
}

struct CellState<T, E> {
    generation: u64,
    value: AsyncResource<T, E>,
}

/// Generation-guarded holder of an [`AsyncResource`].
pub struct ResourceCell<T, E> {
    state: Arc<Mutex<CellState<T, E>>>,
}

impl<T, E> Clone for ResourceCell<T, E> {
    fn clone(&self) -> Self {
        ResourceCell {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T, E> Default for ResourceCell<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> ResourceCell<T, E> {
    pub fn new() -> Self {
        ResourceCell {
            state: Arc::new(Mutex::new(CellState {
                generation: 0,
                value: AsyncResource::Pending,
            })),
        }
    }

    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Start a new load: supersede any in-flight launch and surface
    /// `Pending` immediately.
    pub fn begin(&self) -> LoadTicket {
        let mut state = self.state.lock();
        state.generation += 1;
        state.value = AsyncResource::Pending;
        LoadTicket {
            generation: state.generation,
        }
    }

    /// Apply a settled result, unless the launch it belongs to has been
    /// superseded in the meantime.
    pub fn complete(&self, ticket: LoadTicket, result: Result<T, E>) -> LoadOutcome {
        let mut state = self.state.lock();
        if state.generation != ticket.generation {
            debug!(
                captured = ticket.generation,
                current = state.generation,
                "discarding stale load result"
            );
            return LoadOutcome::Stale;
        }
        state.value = result.into();
        LoadOutcome::Applied
    }

    /// Run one operation under the generation guard.
    pub async fn run<F>(&self, op: F) -> LoadOutcome
    where
        F: Future<Output = Result<T, E>>,
    {
        let ticket = self.begin();
        let result = op.await;
        self.complete(ticket, result)
    }
}

impl<T: Clone, E: Clone> ResourceCell<T, E> {
    pub fn snapshot(&self) -> AsyncResource<T, E> {
        self.state.lock().value.clone()
    }

    /// Current generation together with the value it produced. The
    /// generation identifies one launch, so two successive `Ready`
    /// values are always observed under different generations.
    pub fn observe(&self) -> (u64, AsyncResource<T, E>) {
        let state = self.state.lock();
        (state.generation, state.value.clone())
    }
}

/// Trigger-keyed loader over a [`ResourceCell`].
///
/// `refresh` relaunches only when the trigger differs from the last one
/// seen; `reload` always relaunches (user-initiated retry with the same
/// input).
pub struct Loader<K, T, E> {
    trigger: Mutex<Option<K>>,
    cell: ResourceCell<T, E>,
}

impl<K, T, E> Default for Loader<K, T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T, E> Loader<K, T, E> {
    pub fn new() -> Self {
        Loader {
            trigger: Mutex::new(None),
            cell: ResourceCell::new(),
        }
    }

    pub fn cell(&self) -> &ResourceCell<T, E> {
        &self.cell
    }
}

impl<K: PartialEq, T, E> Loader<K, T, E> {
    pub async fn refresh(&self, trigger: K, op: BoxFuture<'_, Result<T, E>>) -> LoadOutcome {
        {
            let mut current = self.trigger.lock();
            if current.as_ref() == Some(&trigger) {
                return LoadOutcome::Unchanged;
            }
            *current = Some(trigger);
        }
        self.cell.run(op).await
    }

    pub async fn reload(&self, trigger: K, op: BoxFuture<'_, Result<T, E>>) -> LoadOutcome {
        *self.trigger.lock() = Some(trigger);
        self.cell.run(op).await
    }
}

impl<K, T: Clone, E: Clone> Loader<K, T, E> {
    pub fn resource(&self) -> AsyncResource<T, E> {
        self.cell.snapshot()
    }
}

/// Downstream loader that exists only while an upstream resource is
/// `Ready`.
///
/// While the upstream is `Pending` or `ReadyError`, the downstream is
/// parked at `Pending` — the permanently-pending placeholder — and the
/// derive function is never invoked. When the upstream flips to a new
/// `Ready` (new launch generation, possibly different data), the
/// downstream is rebuilt from the fresh upstream data so stale
/// downstream data is never shown against new upstream data.
pub struct DependentLoader<T, E> {
    upstream_seen: Mutex<Option<u64>>,
    cell: ResourceCell<T, E>,
}

impl<T, E> Default for DependentLoader<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> DependentLoader<T, E> {
    pub fn new() -> Self {
        DependentLoader {
            upstream_seen: Mutex::new(None),
            cell: ResourceCell::new(),
        }
    }

    pub fn cell(&self) -> &ResourceCell<T, E> {
        &self.cell
    }

    /// Re-derive from the upstream cell if its current `Ready` launch
    /// has not been consumed yet.
    pub async fn refresh_from<U, UE, F>(
        &self,
        upstream: &ResourceCell<U, UE>,
        make: F,
    ) -> LoadOutcome
    where
        U: Clone,
        UE: Clone,
        F: FnOnce(U) -> BoxFuture<'static, Result<T, E>>,
    {
        let (generation, value) = upstream.observe();

        let data = match value {
            AsyncResource::Ready(data) => data,
            _ => {
                let mut seen = self.upstream_seen.lock();
                if seen.take().is_some() {
                    drop(seen);
                    // invalidates any in-flight derive and parks at Pending
                    self.cell.begin();
                }
                return LoadOutcome::Unchanged;
            }
        };

        {
            let mut seen = self.upstream_seen.lock();
            if *seen == Some(generation) {
                return LoadOutcome::Unchanged;
            }
            *seen = Some(generation);
        }

        self.cell.run(make(data)).await
    }
}

impl<T: Clone, E: Clone> DependentLoader<T, E> {
    pub fn resource(&self) -> AsyncResource<T, E> {
        self.cell.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    type Cell = ResourceCell<String, String>;

    #[test]
    fn new_cell_is_pending() {
        let cell = Cell::new();
        assert!(cell.snapshot().is_pending());
        assert_eq!(cell.generation(), 0);
    }

    #[test]
    fn complete_applies_current_ticket() {
        let cell = Cell::new();
        let ticket = cell.begin();
        let outcome = cell.complete(ticket, Ok("a".to_string()));
        assert_eq!(outcome, LoadOutcome::Applied);
        assert_eq!(cell.snapshot(), AsyncResource::Ready("a".to_string()));
    }

    #[test]
    fn superseded_ticket_is_discarded_not_failed() {
        let cell = Cell::new();
        let first = cell.begin();
        let second = cell.begin();

        // the newer launch settles first
        assert_eq!(cell.complete(second, Ok("b".to_string())), LoadOutcome::Applied);
        // the older launch settles late, in either outcome
        assert_eq!(cell.complete(first, Ok("a".to_string())), LoadOutcome::Stale);
        assert_eq!(cell.snapshot(), AsyncResource::Ready("b".to_string()));
    }

    #[test]
    fn begin_surfaces_pending_immediately() {
        let cell = Cell::new();
        let ticket = cell.begin();
        cell.complete(ticket, Ok("a".to_string()));
        cell.begin();
        assert!(cell.snapshot().is_pending());
    }

    #[test]
    fn stale_failure_does_not_overwrite() {
        let cell = Cell::new();
        let first = cell.begin();
        let second = cell.begin();
        cell.complete(second, Ok("b".to_string()));
        assert_eq!(
            cell.complete(first, Err("boom".to_string())),
            LoadOutcome::Stale
        );
        assert_eq!(cell.snapshot(), AsyncResource::Ready("b".to_string()));
    }

    #[tokio::test]
    async fn slow_superseded_load_loses_to_fast_newer_load() {
        let loader: Loader<u32, String, String> = Loader::new();

        let slow = loader.refresh(
            1,
            Box::pin(async {
                sleep(Duration::from_millis(100)).await;
                Ok("A".to_string())
            }),
        );
        let fast = loader.refresh(
            2,
            Box::pin(async {
                sleep(Duration::from_millis(10)).await;
                Ok("B".to_string())
            }),
        );

        let (slow_outcome, fast_outcome) = tokio::join!(slow, fast);
        assert_eq!(fast_outcome, LoadOutcome::Applied);
        assert_eq!(slow_outcome, LoadOutcome::Stale);
        assert_eq!(loader.resource(), AsyncResource::Ready("B".to_string()));
    }

    #[tokio::test]
    async fn refresh_with_unchanged_trigger_is_skipped() {
        let loader: Loader<u32, String, String> = Loader::new();
        let outcome = loader.refresh(7, Box::pin(async { Ok("x".to_string()) })).await;
        assert_eq!(outcome, LoadOutcome::Applied);

        let outcome = loader
            .refresh(7, Box::pin(async { Ok("never".to_string()) }))
            .await;
        assert_eq!(outcome, LoadOutcome::Unchanged);
        assert_eq!(loader.resource(), AsyncResource::Ready("x".to_string()));
    }

    #[tokio::test]
    async fn reload_relaunches_with_same_trigger() {
        let loader: Loader<u32, String, String> = Loader::new();
        loader.refresh(7, Box::pin(async { Ok("x".to_string()) })).await;

        let outcome = loader
            .reload(7, Box::pin(async { Ok("retried".to_string()) }))
            .await;
        assert_eq!(outcome, LoadOutcome::Applied);
        assert_eq!(loader.resource(), AsyncResource::Ready("retried".to_string()));
    }

    #[tokio::test]
    async fn refresh_surfaces_error_state() {
        let loader: Loader<u32, String, String> = Loader::new();
        let outcome = loader
            .refresh(1, Box::pin(async { Err("unreachable host".to_string()) }))
            .await;
        assert_eq!(outcome, LoadOutcome::Applied);
        assert_eq!(
            loader.resource(),
            AsyncResource::ReadyError("unreachable host".to_string())
        );
    }

    #[tokio::test]
    async fn dependent_parks_pending_while_upstream_unsettled() {
        let upstream: ResourceCell<String, String> = ResourceCell::new();
        let downstream: DependentLoader<usize, String> = DependentLoader::new();

        let outcome = downstream
            .refresh_from(&upstream, |dir: String| {
                Box::pin(async move { Ok(dir.len()) })
            })
            .await;
        assert_eq!(outcome, LoadOutcome::Unchanged);
        assert!(downstream.resource().is_pending());
    }

    #[tokio::test]
    async fn dependent_parks_pending_on_upstream_error() {
        let upstream: ResourceCell<String, String> = ResourceCell::new();
        let ticket = upstream.begin();
        upstream.complete(ticket, Err("denied".to_string()));

        let downstream: DependentLoader<usize, String> = DependentLoader::new();
        let outcome = downstream
            .refresh_from(&upstream, |dir: String| {
                Box::pin(async move { Ok(dir.len()) })
            })
            .await;
        assert_eq!(outcome, LoadOutcome::Unchanged);
        assert!(downstream.resource().is_pending());
    }

    #[tokio::test]
    async fn dependent_rebuilds_when_upstream_ready_changes() {
        let upstream: ResourceCell<String, String> = ResourceCell::new();
        let downstream: DependentLoader<usize, String> = DependentLoader::new();

        let ticket = upstream.begin();
        upstream.complete(ticket, Ok("ab".to_string()));
        let outcome = downstream
            .refresh_from(&upstream, |dir: String| {
                Box::pin(async move { Ok(dir.len()) })
            })
            .await;
        assert_eq!(outcome, LoadOutcome::Applied);
        assert_eq!(downstream.resource(), AsyncResource::Ready(2));

        // same upstream launch: no rebuild
        let outcome = downstream
            .refresh_from(&upstream, |dir: String| {
                Box::pin(async move { Ok(dir.len()) })
            })
            .await;
        assert_eq!(outcome, LoadOutcome::Unchanged);

        // new Ready with different data forces a rebuild
        let ticket = upstream.begin();
        upstream.complete(ticket, Ok("abcd".to_string()));
        let outcome = downstream
            .refresh_from(&upstream, |dir: String| {
                Box::pin(async move { Ok(dir.len()) })
            })
            .await;
        assert_eq!(outcome, LoadOutcome::Applied);
        assert_eq!(downstream.resource(), AsyncResource::Ready(4));
    }

    #[tokio::test]
    async fn dependent_drops_in_flight_derive_when_upstream_resets() {
        let upstream: ResourceCell<String, String> = ResourceCell::new();
        let downstream: DependentLoader<usize, String> = DependentLoader::new();

        let ticket = upstream.begin();
        upstream.complete(ticket, Ok("ab".to_string()));

        let slow = downstream.refresh_from(&upstream, |dir: String| {
            Box::pin(async move {
                sleep(Duration::from_millis(50)).await;
                Ok(dir.len())
            })
        });

        let park = async {
            sleep(Duration::from_millis(10)).await;
            upstream.begin();
            downstream
                .refresh_from(&upstream, |dir: String| {
                    Box::pin(async move { Ok(dir.len()) })
                })
                .await
        };

        let (slow_outcome, park_outcome) = tokio::join!(slow, park);
        assert_eq!(park_outcome, LoadOutcome::Unchanged);
        assert_eq!(slow_outcome, LoadOutcome::Stale);
        assert!(downstream.resource().is_pending());
    }
}
