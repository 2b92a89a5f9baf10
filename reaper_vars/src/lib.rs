//! Named, display-ready variables derived from live REAPER state.
//!
//! A [`Reaper`] graph holds transport, track and fx state and queues a
//! notification whenever an observed property changes. An
//! [`ObservationBinder`] subscribes to every property named by the variable
//! catalog and forwards transformed values to an [`OutputSink`].

pub mod binder;
pub mod catalog;
pub mod config;
pub mod error;
pub mod locator;
mod main_loop;
pub mod notify;
pub mod protocol;
pub mod reaper_state;
pub mod sink;
pub mod transform;

pub use crate::binder::{BindFailure, BindReport, DispatchStats, ObservationBinder};
pub use crate::catalog::{generate, Scope, VariableDefinition};
pub use crate::config::{Cardinality, ModuleConfig};
pub use crate::error::{
    BinderError, ConfigError, DeviceError, LocateError, RecomputeError, TransformError,
};
pub use crate::locator::PropertyLocator;
pub use crate::main_loop::{MainLoop, TickOutcome};
pub use crate::notify::{NotifyPropertyChanged, PropertyChanged, SubscriptionId};
pub use crate::protocol::INBOUND_CAP;
pub use crate::reaper_state::{Reaper, Track, TrackFx, Transport};
pub use crate::sink::{ChannelSink, JsonLinesSink, OutputSink};
pub use crate::transform::Transform;
