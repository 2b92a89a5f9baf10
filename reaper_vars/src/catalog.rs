//! The catalog of exposed variables.
//!
//! For a given cardinality the catalog is always the same ordered list: ten
//! transport entries, then for each track nine track entries followed by three
//! entries per fx slot. Identifiers and labels use 1-based track/fx numbers.

use crate::config::Cardinality;
use crate::locator::PropertyLocator;
use crate::protocol::{Property, VariableDeclaration};
use crate::transform::Transform;
use serde::Serialize;

pub const TRANSPORT_ENTRIES: usize = 10;
pub const TRACK_ENTRIES: usize = 9;
pub const FX_ENTRIES: usize = 3;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "scope")]
pub enum Scope {
    Transport,
    Track { track: usize },
    Fx { track: usize, fx: usize },
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub variable_id: String,
    pub name: String,
    #[serde(flatten)]
    pub scope: Scope,
    pub locator: PropertyLocator,
    pub transform: Option<Transform>,
}

impl VariableDefinition {
    pub fn declaration(&self) -> VariableDeclaration {
        VariableDeclaration {
            variable_id: self.variable_id.clone(),
            name: self.name.clone(),
        }
    }
}

pub fn catalog_len(cardinality: Cardinality) -> usize {
    TRANSPORT_ENTRIES + cardinality.tracks() * (TRACK_ENTRIES + cardinality.fx_per_track() * FX_ENTRIES)
}

pub fn generate(cardinality: Cardinality) -> Vec<VariableDefinition> {
    let mut variables = Vec::with_capacity(catalog_len(cardinality));
    variables.extend(transport_variables());

    for track in 0..cardinality.tracks() {
        variables.extend(track_variables(track));
        for fx in 0..cardinality.fx_per_track() {
            variables.extend(fx_variables(track, fx));
        }
    }

    variables
}

pub fn declarations(variables: &[VariableDefinition]) -> Vec<VariableDeclaration> {
    variables.iter().map(VariableDefinition::declaration).collect()
}

fn transport_variables() -> Vec<VariableDefinition> {
    use Property::*;
    vec![
        transport("playStatus", "Play Status", IsPlaying, label("Playing", "Paused")),
        transport("stopStatus", "Stopped Status", IsStopped, label("Stopped", "Playing")),
        transport("recordStatus", "Record Status", IsRecording, label("Recording", "Not Recording")),
        transport("rewindStatus", "Rewind Status", IsRewinding, label("Rewinding", "Not Rewinding")),
        transport(
            "forwardStatus",
            "Fast Forward Status",
            IsFastForwarding,
            label("Fast Forwarding", "Not Fast Forwarding"),
        ),
        transport("repeatStatus", "Repeat Status", IsRepeatEnabled, label("Active", "Inactive")),
        // The metronome flag lives on the root, not on the transport.
        VariableDefinition {
            variable_id: "clickStatus".to_string(),
            name: "Click Status".to_string(),
            scope: Scope::Transport,
            locator: PropertyLocator::root(IsMetronomeEnabled),
            transform: label("Active", "Inactive"),
        },
        transport("frames", "Frames", Frames, Some(Transform::Identity)),
        transport("beat", "Beat", Beat, Some(Transform::Identity)),
        transport("time", "Time", Time, Some(Transform::Time)),
    ]
}

fn track_variables(track: usize) -> Vec<VariableDefinition> {
    use Property::*;
    vec![
        track_var(track, "Mute", "Muted", IsMuted, label("Muted", "Not Muted")),
        track_var(track, "Solo", "Soloed", IsSoloed, label("Soloed", "Not Soloed")),
        track_var(
            track,
            "Recarm",
            "Armed for Record",
            IsRecordArmed,
            label("Record Armed", "Record Disarmed"),
        ),
        track_var(track, "Select", "Selected", IsSelected, label("Selected", "Not Selected")),
        track_var(track, "Name", "Name", Name, None),
        track_var(
            track,
            "Monitor",
            "Monitoring",
            RecordMonitoring,
            label("Monitoring", "Not Monitoring"),
        ),
        track_var(track, "vu", "VU", Vu, Some(Transform::VuPercent)),
        track_var(track, "vu_db", "VU db", Vu, Some(Transform::VuDb)),
        track_var(track, "volume_db", "Volume db", VolumeDb, Some(Transform::VolumeDb)),
    ]
}

fn fx_variables(track: usize, fx: usize) -> Vec<VariableDefinition> {
    use Property::*;
    vec![
        // isBypassed == true renders as "Active".
        fx_var(track, fx, "Bypass", "Bypassed", IsBypassed, label("Active", "Bypassed")),
        fx_var(track, fx, "Name", "Name", Name, None),
        fx_var(track, fx, "Openui", "UI Open", IsUiOpen, label("Open", "Closed")),
    ]
}

fn label(on: &'static str, off: &'static str) -> Option<Transform> {
    Some(Transform::Label { on, off })
}

fn transport(
    id: &str,
    name: &str,
    property: Property,
    transform: Option<Transform>,
) -> VariableDefinition {
    VariableDefinition {
        variable_id: id.to_string(),
        name: name.to_string(),
        scope: Scope::Transport,
        locator: PropertyLocator::transport(property),
        transform,
    }
}

fn track_var(
    track: usize,
    id: &str,
    name: &str,
    property: Property,
    transform: Option<Transform>,
) -> VariableDefinition {
    let n = track + 1;
    VariableDefinition {
        variable_id: format!("track{n}{id}"),
        name: format!("Track {n} {name}"),
        scope: Scope::Track { track },
        locator: PropertyLocator::track(track, property),
        transform,
    }
}

fn fx_var(
    track: usize,
    fx: usize,
    id: &str,
    name: &str,
    property: Property,
    transform: Option<Transform>,
) -> VariableDefinition {
    let n = track + 1;
    let m = fx + 1;
    VariableDefinition {
        variable_id: format!("track{n}Fx{m}{id}"),
        name: format!("Track {n} Fx {m} {name}"),
        scope: Scope::Fx { track, fx },
        locator: PropertyLocator::fx(track, fx, property),
        transform,
    }
}
