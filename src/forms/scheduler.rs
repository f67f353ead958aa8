// SPDX-License-Identifier: MIT

//! Evaluation scheduling for an in-progress form
//!
//! Visibility is live: every value change schedules a recomputation that
//! fires after a short quiet period, and a newer change cancels the pending
//! one (trailing-edge debounce, last write wins). Validation is on demand:
//! it runs only when the user submits, after flushing any pending
//! recomputation so it never sees a stale visible set.
//!
//! Scheduling spawns onto the current tokio runtime.

use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::forms::config::EngineConfig;
use crate::forms::engine::FormEngine;
use crate::forms::validation::ErrorMap;
use crate::forms::values::FormValues;
use crate::forms::visibility::VisibleFields;

/// A cancellable delayed task. Scheduling replaces whatever was pending.
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` once `delay` has passed without another `schedule` call
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Cancel the pending task. Returns true if one had not yet finished.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Outcome of a submit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Every visible field passed; carries the submitted values
    Accepted(Value),
    /// At least one visible field failed
    Rejected(ErrorMap),
}

/// One user's form-fill session.
///
/// Owns the value map; the engine only ever sees snapshots of it.
pub struct FormSession {
    engine: FormEngine,
    values: FormValues,
    errors: ErrorMap,
    debouncer: Debouncer,
    generation: Arc<AtomicU64>,
    evaluations: Arc<AtomicU64>,
    visible_tx: Arc<watch::Sender<VisibleFields>>,
}

impl FormSession {
    /// Start a session with empty values. The initial visible set is
    /// computed immediately.
    pub fn new(engine: FormEngine, config: &EngineConfig) -> Self {
        Self::with_values(engine, config, FormValues::new())
    }

    /// Start a session from pre-filled values
    pub fn with_values(engine: FormEngine, config: &EngineConfig, values: FormValues) -> Self {
        let (visible_tx, _) = watch::channel(VisibleFields::new());
        let mut session = Self {
            engine,
            values,
            errors: ErrorMap::new(),
            debouncer: Debouncer::new(config.debounce),
            generation: Arc::new(AtomicU64::new(0)),
            evaluations: Arc::new(AtomicU64::new(0)),
            visible_tx: Arc::new(visible_tx),
        };
        session.recompute_now();
        session
    }

    /// Record a value change and schedule a visibility recomputation.
    /// Any error shown for this field is cleared.
    pub fn set_value(&mut self, field_name: &str, value: Value) {
        self.errors.remove(field_name);
        if self.values.set(field_name, value) {
            self.schedule_recompute();
        }
    }

    /// Clear a field's value entirely
    pub fn clear_value(&mut self, field_name: &str) {
        self.errors.remove(field_name);
        if self.values.remove(field_name).is_some() {
            self.schedule_recompute();
        }
    }

    /// Recompute now if a recomputation is pending
    pub fn flush(&mut self) {
        if self.debouncer.cancel() {
            self.recompute_now();
        }
    }

    /// Validate against the up-to-date visible set
    pub fn submit(&mut self) -> SubmitOutcome {
        self.flush();
        let visible = self.visible();
        let errors = self.engine.validate(&visible, &self.values);

        if errors.is_empty() {
            self.errors.clear();
            log::info!("Form '{}' accepted", self.engine.template().slug);
            SubmitOutcome::Accepted(self.values.to_json())
        } else {
            log::info!(
                "Form '{}' rejected with {} error(s)",
                self.engine.template().slug,
                errors.len()
            );
            self.errors = errors.clone();
            SubmitOutcome::Rejected(errors)
        }
    }

    /// Visible set as of the latest completed recomputation
    pub fn visible(&self) -> VisibleFields {
        self.visible_tx.borrow().clone()
    }

    /// Receive every published visible set
    pub fn subscribe(&self) -> watch::Receiver<VisibleFields> {
        self.visible_tx.subscribe()
    }

    /// Errors from the last submit, minus fields edited since
    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn engine(&self) -> &FormEngine {
        &self.engine
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Number of visibility recomputations that have completed
    pub fn evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::SeqCst)
    }

    fn schedule_recompute(&mut self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.generation);
        let evaluations = Arc::clone(&self.evaluations);
        let visible_tx = Arc::clone(&self.visible_tx);
        let engine = self.engine.clone();
        let snapshot = self.values.clone();

        self.debouncer.schedule(async move {
            // A newer change or a flush superseded this one
            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            let visible = engine.visible_fields(&snapshot);

            // Re-check under the channel lock: the task may already be
            // running when a newer change aborts it.
            let published = visible_tx.send_if_modified(|latest| {
                if current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                *latest = visible;
                evaluations.fetch_add(1, Ordering::SeqCst);
                true
            });
            if published {
                log::debug!("Debounced recomputation published");
            } else {
                log::debug!("Dropping superseded recomputation {}", generation);
            }
        });
    }

    fn recompute_now(&mut self) {
        let visible = self.engine.visible_fields(&self.values);
        let (generation, evaluations) = (&self.generation, &self.evaluations);
        self.visible_tx.send_modify(|latest| {
            generation.fetch_add(1, Ordering::SeqCst);
            *latest = visible;
            evaluations.fetch_add(1, Ordering::SeqCst);
        });
    }
}
