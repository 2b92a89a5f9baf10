use crate::binder::{BindReport, DispatchStats, ObservationBinder};
use crate::config::{Cardinality, ModuleConfig};
use crate::error::{BinderError, ConfigError};
use crate::protocol::DeviceEvent;
use crate::reaper_state::Reaper;
use crate::sink::OutputSink;
use crossbeam_channel::{Receiver, TryRecvError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub events: usize,
    pub dispatch: DispatchStats,
    pub inbound_closed: bool,
}

/// Owns the device graph and its binder, and advances both one tick at a time
/// on the caller's thread.
pub struct MainLoop<S: OutputSink> {
    inbound_rx: Receiver<DeviceEvent>,
    reaper: Reaper,
    binder: ObservationBinder<S>,
    refresh_on_init: bool,
}

impl<S: OutputSink> MainLoop<S> {
    pub fn new(
        inbound_rx: Receiver<DeviceEvent>,
        config: &ModuleConfig,
        sink: S,
    ) -> Result<Self, ConfigError> {
        let cardinality = config.validate()?;
        Ok(Self {
            inbound_rx,
            reaper: Reaper::with_cardinality(cardinality.tracks(), cardinality.fx_per_track()),
            binder: ObservationBinder::new(cardinality, sink),
            refresh_on_init: config.refresh_on_init,
        })
    }

    pub fn reaper(&self) -> &Reaper {
        &self.reaper
    }

    pub fn binder(&self) -> &ObservationBinder<S> {
        &self.binder
    }

    pub fn sink(&self) -> &S {
        self.binder.sink()
    }

    pub fn into_sink(self) -> S {
        self.binder.into_sink()
    }

    /// Binds the catalog and, when configured to, publishes a first snapshot.
    pub fn start(&mut self) -> Result<BindReport, BinderError> {
        let report = self.binder.bind(&mut self.reaper)?;
        if self.refresh_on_init {
            self.binder.publish_all(&self.reaper)?;
        }
        Ok(report)
    }

    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        loop {
            match self.inbound_rx.try_recv() {
                Ok(event) => {
                    outcome.events += 1;
                    self.handle_event(event, &mut outcome.dispatch);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    outcome.inbound_closed = true;
                    break;
                }
            }
        }

        add_stats(&mut outcome.dispatch, self.binder.dispatch(&self.reaper));
        outcome
    }

    pub fn shutdown(&mut self) {
        let _ = self.binder.unbind(&mut self.reaper);
    }

    fn handle_event(&mut self, event: DeviceEvent, stats: &mut DispatchStats) {
        match event {
            DeviceEvent::SetProperty {
                target,
                property,
                value,
            } => {
                match self.reaper.apply(target, property, value) {
                    // Dispatch right away so each update reflects the state
                    // produced by this event, not a later one.
                    Ok(true) => add_stats(stats, self.binder.dispatch(&self.reaper)),
                    Ok(false) => {}
                    Err(e) => tracing::warn!(%target, %property, "device update rejected: {e}"),
                }
            }
            DeviceEvent::Refresh => {
                add_stats(stats, self.binder.dispatch(&self.reaper));
                match self.binder.publish_all(&self.reaper) {
                    Ok(s) => add_stats(stats, s),
                    Err(e) => tracing::warn!("refresh skipped: {e}"),
                }
            }
            DeviceEvent::Reconfigure { num_tracks, num_fx } => {
                let cardinality = match Cardinality::new(num_tracks, num_fx) {
                    Ok(c) => c,
                    Err(e) => {
                        tracing::warn!("reconfigure rejected: {e}");
                        return;
                    }
                };
                self.reconfigure(cardinality, stats);
            }
        }
    }

    /// Swaps in a fresh graph at `cardinality` and binds the new catalog.
    /// Ignored until [`start`](Self::start) has bound the loop.
    fn reconfigure(&mut self, cardinality: Cardinality, stats: &mut DispatchStats) {
        if !self.binder.is_bound() {
            tracing::warn!("reconfigure ignored: loop is not started");
            return;
        }

        // Deliver what the old graph already reported before it goes away.
        add_stats(stats, self.binder.dispatch(&self.reaper));
        if let Err(e) = self.binder.unbind(&mut self.reaper) {
            tracing::warn!("unbind before reconfigure failed: {e}");
            return;
        }

        self.reaper = Reaper::with_cardinality(cardinality.tracks(), cardinality.fx_per_track());
        let bound = match self.binder.set_cardinality(cardinality) {
            Ok(()) => self.binder.bind(&mut self.reaper),
            Err(e) => Err(e),
        };
        match bound {
            Ok(report) => {
                tracing::info!(
                    tracks = cardinality.tracks(),
                    fx = cardinality.fx_per_track(),
                    bound = report.bound,
                    "reconfigured"
                );
            }
            Err(e) => {
                tracing::warn!("rebind failed: {e}");
                return;
            }
        }

        if self.refresh_on_init {
            if let Ok(s) = self.binder.publish_all(&self.reaper) {
                add_stats(stats, s);
            }
        }
    }
}

fn add_stats(total: &mut DispatchStats, more: DispatchStats) {
    total.notifications += more.notifications;
    total.updates += more.updates;
    total.failures += more.failures;
}
