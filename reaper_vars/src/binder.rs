use crate::catalog::{self, VariableDefinition};
use crate::config::Cardinality;
use crate::error::{BinderError, LocateError, RecomputeError};
use crate::locator::{self, PropertyLocator};
use crate::notify::{NotifyPropertyChanged, PropertyChanged, SubscriptionId};
use crate::protocol::DisplayValue;
use crate::reaper_state::Reaper;
use crate::sink::OutputSink;
use crate::transform;
use crossbeam_channel::{unbounded, Receiver, TryRecvError};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct BindFailure {
    pub variable_id: String,
    pub error: LocateError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindReport {
    pub bound: usize,
    pub failures: Vec<BindFailure>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub notifications: usize,
    pub updates: usize,
    pub failures: usize,
}

enum BindState {
    Unbound,
    Bound(Bindings),
}

struct Bindings {
    rx: Receiver<PropertyChanged>,
    by_subscription: HashMap<SubscriptionId, usize>,
    // Catalog order.
    registrations: Vec<(PropertyLocator, SubscriptionId, usize)>,
}

/// Keeps the sink in step with the device graph for one catalog.
///
/// Unbound until [`bind`](Self::bind) registers a subscription per catalog
/// entry. Notifications queue up on the binder's channel and are turned into
/// sink updates by [`dispatch`](Self::dispatch), one update per notification.
/// [`unbind`](Self::unbind) releases every subscription and discards anything
/// still queued.
pub struct ObservationBinder<S: OutputSink> {
    cardinality: Cardinality,
    variables: Vec<VariableDefinition>,
    sink: S,
    state: BindState,
}

impl<S: OutputSink> ObservationBinder<S> {
    pub fn new(cardinality: Cardinality, sink: S) -> Self {
        Self {
            cardinality,
            variables: catalog::generate(cardinality),
            sink,
            state: BindState::Unbound,
        }
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn variables(&self) -> &[VariableDefinition] {
        &self.variables
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.state, BindState::Bound(_))
    }

    pub fn subscription_count(&self) -> usize {
        match &self.state {
            BindState::Bound(b) => b.registrations.len(),
            BindState::Unbound => 0,
        }
    }

    /// Swaps the catalog for a new cardinality. Only allowed while unbound.
    pub fn set_cardinality(&mut self, cardinality: Cardinality) -> Result<(), BinderError> {
        if self.is_bound() {
            return Err(BinderError::AlreadyBound);
        }
        self.cardinality = cardinality;
        self.variables = catalog::generate(cardinality);
        Ok(())
    }

    /// Declares the catalog to the sink and subscribes every entry.
    ///
    /// Entries whose locator does not resolve against `root` are reported in
    /// the returned [`BindReport`]; the rest are bound regardless.
    pub fn bind(&mut self, root: &mut Reaper) -> Result<BindReport, BinderError> {
        if self.is_bound() {
            tracing::warn!("bind called while already bound; ignoring");
            return Err(BinderError::AlreadyBound);
        }

        let (tx, rx) = unbounded();
        let mut bindings = Bindings {
            rx,
            by_subscription: HashMap::with_capacity(self.variables.len()),
            registrations: Vec::with_capacity(self.variables.len()),
        };
        let mut report = BindReport::default();

        for (index, def) in self.variables.iter().enumerate() {
            let subscribed = def
                .locator
                .resolve_mut(root)
                .and_then(|item| item.subscribe(def.locator.property, tx.clone()));
            match subscribed {
                Ok(id) => {
                    bindings.by_subscription.insert(id, index);
                    bindings.registrations.push((def.locator, id, index));
                    report.bound += 1;
                }
                Err(error) => {
                    tracing::warn!(variable_id = %def.variable_id, "binding failed: {error}");
                    report.failures.push(BindFailure {
                        variable_id: def.variable_id.clone(),
                        error,
                    });
                }
            }
        }

        self.sink.declare(&catalog::declarations(&self.variables));
        self.state = BindState::Bound(bindings);

        tracing::debug!(
            bound = report.bound,
            failed = report.failures.len(),
            tracks = self.cardinality.tracks(),
            fx = self.cardinality.fx_per_track(),
            "bound variable catalog"
        );
        Ok(report)
    }

    /// Releases every subscription held on `root`. Returns how many were
    /// released. Calling this while unbound changes nothing.
    pub fn unbind(&mut self, root: &mut Reaper) -> Result<usize, BinderError> {
        let BindState::Bound(bindings) = std::mem::replace(&mut self.state, BindState::Unbound)
        else {
            tracing::warn!("unbind called while not bound; ignoring");
            return Err(BinderError::NotBound);
        };

        let mut released = 0;
        for (locator, id, _) in &bindings.registrations {
            if let Ok(item) = locator::resolve_path_mut(root, locator.object) {
                if item.unsubscribe(*id) {
                    released += 1;
                }
            }
        }
        // Registrations left on another graph die with the receiver.
        drop(bindings);

        tracing::debug!(released, "unbound variable catalog");
        Ok(released)
    }

    /// Full unbind (if bound), regenerate for `cardinality`, bind.
    pub fn rebind(
        &mut self,
        root: &mut Reaper,
        cardinality: Cardinality,
    ) -> Result<BindReport, BinderError> {
        if self.is_bound() {
            self.unbind(root)?;
        }
        self.set_cardinality(cardinality)?;
        self.bind(root)
    }

    /// Turns every queued notification into a sink update.
    pub fn dispatch(&mut self, root: &Reaper) -> DispatchStats {
        let mut stats = DispatchStats::default();
        let BindState::Bound(bindings) = &self.state else {
            return stats;
        };

        loop {
            let changed = match bindings.rx.try_recv() {
                Ok(changed) => changed,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            };
            stats.notifications += 1;

            let Some(&index) = bindings.by_subscription.get(&changed.subscription) else {
                continue;
            };
            let def = &self.variables[index];
            match recompute(def, root) {
                Ok(value) => {
                    self.sink.update(&def.variable_id, value);
                    stats.updates += 1;
                }
                Err(e) => {
                    tracing::warn!(variable_id = %def.variable_id, "recompute failed: {e}");
                    stats.failures += 1;
                }
            }
        }

        stats
    }

    /// Pushes the current value of every bound entry, in catalog order.
    pub fn publish_all(&mut self, root: &Reaper) -> Result<DispatchStats, BinderError> {
        let BindState::Bound(bindings) = &self.state else {
            return Err(BinderError::NotBound);
        };

        let mut stats = DispatchStats::default();
        for (_, _, index) in &bindings.registrations {
            let def = &self.variables[*index];
            match recompute(def, root) {
                Ok(value) => {
                    self.sink.update(&def.variable_id, value);
                    stats.updates += 1;
                }
                Err(e) => {
                    tracing::warn!(variable_id = %def.variable_id, "recompute failed: {e}");
                    stats.failures += 1;
                }
            }
        }
        Ok(stats)
    }
}

/// Reads the located property from `root` and applies the entry's transform.
pub fn recompute(
    definition: &VariableDefinition,
    root: &Reaper,
) -> Result<DisplayValue, RecomputeError> {
    let raw = definition.locator.read(root)?;
    Ok(transform::display_value(definition.transform.as_ref(), raw)?)
}
