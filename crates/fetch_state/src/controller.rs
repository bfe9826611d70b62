//! The fetch state controller.
//!
//! A [`FetchController`] owns an observable [`FetchState`] and manages the
//! retrieval attempts made against a resource identifier that may change over
//! its lifetime.
//!
//! Every attempt captures a generation number when it starts. When it
//! resolves, its result is committed only if the controller is still attached
//! and no newer attempt has started since. Superseded attempts are not
//! cancelled; they run to completion and their results are dropped.
//!
//! The generation counter lives inside the watched state, so the freshness
//! check and the mutation happen under the same channel lock and can never
//! interleave with another update.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, info_span, instrument, Instrument};

use crate::errors::{Error, FetchError};
use crate::retriever::{Response, Retriever};
use crate::state::FetchState;

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;

/// Options controlling when a controller starts attempts on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// When true, attempts only start through [`FetchController::refetch`].
    pub manual: bool,
}

impl FetchOptions {
    pub fn manual() -> Self {
        Self { manual: true }
    }
}

/// Handle to a fetch controller.
///
/// Cloning the handle is cheap; all clones share the same state.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use fetch_state::{FetchController, FetchOptions, HttpRetriever, HttpRetrieverConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let retriever = HttpRetriever::new(HttpRetrieverConfig {
///     base_url: Some("https://example.com".to_string()),
///     ..Default::default()
/// })?;
///
/// let controller: FetchController<serde_json::Value> =
///     FetchController::new("/api/data", FetchOptions::default(), Arc::new(retriever))?;
///
/// let state = controller.settled().await;
/// println!("data: {:?}, error: {:?}", state.data, state.error);
///
/// controller.detach();
/// # Ok(())
/// # }
/// ```
pub struct FetchController<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for FetchController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for FetchController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchController")
            .field("resource", &*self.inner.resource.borrow())
            .field("manual", &self.inner.manual.load(Ordering::SeqCst))
            .field("detached", &self.inner.detached.load(Ordering::SeqCst))
            .finish()
    }
}

struct Inner<T> {
    retriever: Arc<dyn Retriever>,
    runtime: Handle,
    state: watch::Sender<FetchState<T>>,
    resource: watch::Sender<String>,
    manual: AtomicBool,
    detached: AtomicBool,
}

impl<T> FetchController<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Creates a controller for `resource`.
    ///
    /// Unless `options.manual` is set, the first attempt starts immediately, so
    /// the first observable state is already loading.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoRuntime` when called outside a tokio runtime.
    pub fn new(
        resource: impl Into<String>,
        options: FetchOptions,
        retriever: Arc<dyn Retriever>,
    ) -> Result<Self, Error> {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let (state, _) = watch::channel(FetchState::initial(options.manual));
        let (resource, _) = watch::channel(resource.into());

        let controller = Self {
            inner: Arc::new(Inner {
                retriever,
                runtime,
                state,
                resource,
                manual: AtomicBool::new(options.manual),
                detached: AtomicBool::new(false),
            }),
        };

        if !options.manual {
            controller.inner.start_attempt();
        }

        Ok(controller)
    }

    /// Starts a new attempt against the current resource and returns at once.
    ///
    /// `loading` becomes true and `error` is cleared straight away; `data` is
    /// kept. Any attempt still in flight is superseded.
    #[instrument(skip(self))]
    pub fn refetch(&self) {
        self.inner.start_attempt();
    }

    /// Changes the resource identifier.
    ///
    /// A different identifier starts one attempt unless the controller is
    /// manual. Setting the current identifier again does nothing.
    #[instrument(skip(self, resource))]
    pub fn set_resource(&self, resource: impl Into<String>) {
        if self.is_detached() {
            debug!("Ignoring resource change on a detached controller");
            return;
        }

        let resource = resource.into();
        let changed = self.inner.resource.send_if_modified(|current| {
            if *current == resource {
                return false;
            }
            *current = resource;
            true
        });

        if changed && !self.inner.manual.load(Ordering::SeqCst) {
            self.inner.start_attempt();
        }
    }

    /// Switches between manual and automatic triggering.
    ///
    /// Turning manual mode off starts one attempt against the current
    /// resource. Turning it on leaves in-flight attempts alone.
    #[instrument(skip(self))]
    pub fn set_manual(&self, manual: bool) {
        let previous = self.inner.manual.swap(manual, Ordering::SeqCst);
        if previous && !manual {
            self.inner.start_attempt();
        }
    }

    pub fn resource(&self) -> String {
        self.inner.resource.borrow().clone()
    }

    pub fn options(&self) -> FetchOptions {
        FetchOptions {
            manual: self.inner.manual.load(Ordering::SeqCst),
        }
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> FetchState<T> {
        self.inner.state.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.inner.state.subscribe()
    }

    /// Waits for the first state matching `predicate`.
    ///
    /// Also returns, with the frozen state, once the controller is detached.
    pub async fn wait_until<F>(&self, mut predicate: F) -> FetchState<T>
    where
        F: FnMut(&FetchState<T>) -> bool,
    {
        let mut receiver = self.inner.state.subscribe();
        let detached = &self.inner.detached;
        let result = receiver
            .wait_for(|state| detached.load(Ordering::SeqCst) || predicate(state))
            .await
            .map(|state| state.clone());

        result.unwrap_or_else(|_| self.snapshot())
    }

    /// Waits until no attempt is outstanding.
    pub async fn settled(&self) -> FetchState<T> {
        self.wait_until(|state| !state.loading).await
    }

    /// Permanently retires the controller.
    ///
    /// The state is frozen from here on: in-flight attempts resolve into
    /// nothing and further calls start no attempts. Calling it again is a
    /// no-op.
    #[instrument(skip(self))]
    pub fn detach(&self) {
        // Flip the flag under the channel lock so no commit can straddle it,
        // and wake waiters without touching the value.
        self.inner.state.send_if_modified(|_| {
            !self.inner.detached.swap(true, Ordering::SeqCst)
        });
        info!("Controller detached");
    }

    pub fn is_detached(&self) -> bool {
        self.inner.detached.load(Ordering::SeqCst)
    }
}

impl<T> Inner<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn start_attempt(self: &Arc<Self>) {
        let mut generation = 0;
        let started = self.state.send_if_modified(|state| {
            if self.detached.load(Ordering::SeqCst) {
                return false;
            }
            state.generation += 1;
            state.loading = true;
            state.error = None;
            generation = state.generation;
            true
        });

        if !started {
            debug!("Ignoring refetch on a detached controller");
            return;
        }

        let resource = self.resource.borrow().clone();
        debug!(resource = %resource, generation = generation, "Starting attempt");

        let span = info_span!("fetch_attempt", resource = %resource, generation = generation);
        let inner = Arc::clone(self);
        self.runtime.spawn(
            async move {
                let outcome = inner.retriever.retrieve(&resource).await;
                inner.resolve(generation, outcome);
            }
            .instrument(span),
        );
    }

    fn resolve(&self, generation: u64, outcome: Result<Response, FetchError>) {
        let result = outcome.and_then(|response| {
            if response.successful {
                response.json::<T>()
            } else {
                Err(FetchError::Status {
                    status: response.status,
                })
            }
        });

        let failed = result.is_err();
        let committed = self.state.send_if_modified(|state| {
            if self.detached.load(Ordering::SeqCst) || state.generation != generation {
                return false;
            }
            match result {
                Ok(data) => {
                    state.data = Some(data);
                    state.error = None;
                }
                Err(error) => state.error = Some(error),
            }
            state.loading = false;
            true
        });

        if committed {
            debug!(failed = failed, "Attempt committed");
        } else {
            debug!("Discarded result of a superseded or detached attempt");
        }
    }
}
