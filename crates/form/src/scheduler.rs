//! Debounced per-field validation scheduling.
//!
//! Each field owns at most one pending task. Scheduling a field again cancels
//! its previous task, so only the latest value is ever validated.
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//! use formflow_form::{DebounceScheduler, FieldKey};
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() {
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let scheduler = DebounceScheduler::new();
//!
//! for value in ["a", "ab", "abc"] {
//!     let seen = Arc::clone(&seen);
//!     scheduler.schedule(FieldKey::from("name"), value, Duration::from_millis(300), move |_, v| {
//!         seen.lock().unwrap().push(v);
//!     });
//! }
//!
//! tokio::time::sleep(Duration::from_millis(301)).await;
//! tokio::task::yield_now().await;
//! assert_eq!(*seen.lock().unwrap(), vec!["abc".to_string()]);
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::key::FieldKey;

struct PendingValidation {
    generation: u64,
    token: CancellationToken,
    value: String,
}

/// Arena of cancelable, delayed validation tasks keyed by field.
///
/// Tasks are spawned on the current Tokio runtime. Outside a runtime the
/// callback runs immediately instead.
///
/// Every task token is a child of one root token, so [`dispose`](Self::dispose)
/// (or dropping the scheduler) stops all of them at once.
pub struct DebounceScheduler {
    tasks: Arc<DashMap<FieldKey, PendingValidation>>,
    generation: AtomicU64,
    cancel: CancellationToken,
}

impl DebounceScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(DashMap::new()),
            generation: AtomicU64::new(0),
            cancel: CancellationToken::new(),
        }
    }

    /// Arms a timer for `field`, replacing any pending one.
    ///
    /// When the timer fires, `callback` runs with the field and the value
    /// captured here. A disposed scheduler ignores the call.
    pub fn schedule<F>(&self, field: FieldKey, value: impl Into<String>, delay: Duration, callback: F)
    where
        F: FnOnce(FieldKey, String) + Send + 'static,
    {
        let value = value.into();
        if self.cancel.is_cancelled() {
            debug!(field = %field, "scheduler disposed, dropping validation");
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(field = %field, "no async runtime, validating immediately");
            self.cancel(field.as_str());
            callback(field, value);
            return;
        };

        let deadline = tokio::time::Instant::now() + delay;
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let token = self.cancel.child_token();
        let pending = PendingValidation {
            generation,
            token: token.clone(),
            value: value.clone(),
        };
        if let Some(previous) = self.tasks.insert(field.clone(), pending) {
            previous.token.cancel();
            debug!(field = %field, "superseded pending validation");
        }
        debug!(field = %field, delay_ms = delay.as_millis() as u64, "validation scheduled");

        let tasks = Arc::clone(&self.tasks);
        runtime.spawn(async move {
            tokio::select! {
                () = tokio::time::sleep_until(deadline) => {}
                () = token.cancelled() => return,
            }

            // Only the task still registered for the field may fire.
            let current = tasks.remove_if(&field, |_, pending| pending.generation == generation);
            if current.is_some() {
                callback(field, value);
            }
        });
    }

    /// Drops the pending task for `field` without running it.
    ///
    /// Returns true if a task was pending.
    pub fn cancel(&self, field: &str) -> bool {
        match self.tasks.remove(field) {
            Some((_, pending)) => {
                pending.token.cancel();
                debug!(field = %field, "pending validation cancelled");
                true
            }
            None => false,
        }
    }

    /// Drops every pending task.
    pub fn cancel_all(&self) {
        self.tasks.retain(|_, pending| {
            pending.token.cancel();
            false
        });
    }

    /// The value a pending task for `field` will validate, if any.
    #[must_use]
    pub fn pending(&self, field: &str) -> Option<String> {
        self.tasks.get(field).map(|entry| entry.value.clone())
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Cancels everything and turns later [`schedule`](Self::schedule) calls
    /// into no-ops.
    pub fn dispose(&self) {
        self.cancel.cancel();
        self.cancel_all();
        debug!("debounce scheduler disposed");
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Default for DebounceScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DebounceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebounceScheduler")
            .field("pending", &self.tasks.len())
            .field("disposed", &self.cancel.is_cancelled())
            .finish()
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
