use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an observed object sits in the device-state graph.
///
/// Indices are 0-based. Identifiers and labels shown to users are 1-based.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ObjectPath {
    Root,
    Transport,
    Track(usize),
    Fx(usize, usize),
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectPath::Root => write!(f, "root"),
            ObjectPath::Transport => write!(f, "root.transport"),
            ObjectPath::Track(t) => write!(f, "root.track[{t}]"),
            ObjectPath::Fx(t, fx) => write!(f, "root.track[{t}].fx[{fx}]"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    // root
    IsMetronomeEnabled,

    // transport
    IsPlaying,
    IsStopped,
    IsRecording,
    IsRewinding,
    IsFastForwarding,
    IsRepeatEnabled,
    Frames,
    Beat,
    Time,

    // track
    IsMuted,
    IsSoloed,
    IsRecordArmed,
    IsSelected,
    RecordMonitoring,
    Vu,
    VolumeDb,

    // fx
    IsBypassed,
    IsUiOpen,

    // track and fx
    Name,
}

impl Property {
    pub fn name(&self) -> &'static str {
        match self {
            Property::IsMetronomeEnabled => "isMetronomeEnabled",
            Property::IsPlaying => "isPlaying",
            Property::IsStopped => "isStopped",
            Property::IsRecording => "isRecording",
            Property::IsRewinding => "isRewinding",
            Property::IsFastForwarding => "isFastForwarding",
            Property::IsRepeatEnabled => "isRepeatEnabled",
            Property::Frames => "frames",
            Property::Beat => "beat",
            Property::Time => "time",
            Property::IsMuted => "isMuted",
            Property::IsSoloed => "isSoloed",
            Property::IsRecordArmed => "isRecordArmed",
            Property::IsSelected => "isSelected",
            Property::RecordMonitoring => "recordMonitoring",
            Property::Vu => "vu",
            Property::VolumeDb => "volumeDb",
            Property::IsBypassed => "isBypassed",
            Property::IsUiOpen => "isUiOpen",
            Property::Name => "name",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A property value as the device reports it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Bool(_) => "bool",
            RawValue::Number(_) => "number",
            RawValue::Text(_) => "text",
        }
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

/// A value as handed to the consumer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum DisplayValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<RawValue> for DisplayValue {
    fn from(v: RawValue) -> Self {
        match v {
            RawValue::Bool(b) => DisplayValue::Bool(b),
            RawValue::Number(n) => DisplayValue::Number(n),
            RawValue::Text(s) => DisplayValue::Text(s),
        }
    }
}

impl From<&str> for DisplayValue {
    fn from(v: &str) -> Self {
        DisplayValue::Text(v.to_string())
    }
}

impl From<f64> for DisplayValue {
    fn from(v: f64) -> Self {
        DisplayValue::Number(v)
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Bool(b) => write!(f, "{b}"),
            DisplayValue::Number(n) => write!(f, "{n}"),
            DisplayValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclaration {
    pub variable_id: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum SinkMessage {
    Declare { variables: Vec<VariableDeclaration> },
    Update { variable_id: String, value: DisplayValue },
}

/// Events a transport client feeds into the observation loop.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum DeviceEvent {
    SetProperty {
        target: ObjectPath,
        property: Property,
        value: RawValue,
    },
    Refresh,
    Reconfigure { num_tracks: u16, num_fx: u16 },
}
