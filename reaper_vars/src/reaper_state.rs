use crate::error::DeviceError;
use crate::locator;
use crate::notify::{
    assign, expect_bool, expect_number, expect_text, unknown_property, Notifier,
    NotifyPropertyChanged,
};
use crate::protocol::{ObjectPath, Property, RawValue};

/// Live device state: the root of the observed graph.
///
/// The transport client owns this and mutates it as remote updates arrive.
/// Setters notify subscribers only when the stored value actually changes.
#[derive(Debug, Default)]
pub struct Reaper {
    transport: Transport,
    tracks: Vec<Track>,
    is_metronome_enabled: bool,
    notifier: Notifier,
}

impl Reaper {
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph with a fixed number of tracks, each holding `num_fx` fx slots.
    pub fn with_cardinality(num_tracks: usize, num_fx: usize) -> Self {
        let mut reaper = Self::new();
        for _ in 0..num_tracks {
            let track = reaper.push_track();
            for _ in 0..num_fx {
                track.push_fx();
            }
        }
        reaper
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut Transport {
        &mut self.transport
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn track_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    pub fn push_track(&mut self) -> &mut Track {
        let index = self.tracks.len();
        self.tracks.push(Track::new(index));
        &mut self.tracks[index]
    }

    pub fn set_metronome_enabled(&mut self, value: bool) -> bool {
        assign(
            &mut self.is_metronome_enabled,
            value,
            &mut self.notifier,
            Property::IsMetronomeEnabled,
        )
    }

    /// Applies a decoded remote update. Returns whether the value changed.
    pub fn apply(
        &mut self,
        target: ObjectPath,
        property: Property,
        value: RawValue,
    ) -> Result<bool, DeviceError> {
        locator::resolve_path_mut(self, target)?.set_property(property, value)
    }

    /// Live subscriptions across the whole graph.
    pub fn subscription_count(&self) -> usize {
        self.notifier.len()
            + self.transport.notifier.len()
            + self
                .tracks
                .iter()
                .map(|t| t.notifier.len() + t.fx.iter().map(|f| f.notifier.len()).sum::<usize>())
                .sum::<usize>()
    }
}

impl NotifyPropertyChanged for Reaper {
    fn path(&self) -> ObjectPath {
        ObjectPath::Root
    }

    fn property_value(&self, property: Property) -> Option<RawValue> {
        match property {
            Property::IsMetronomeEnabled => Some(self.is_metronome_enabled.into()),
            _ => None,
        }
    }

    fn set_property(&mut self, property: Property, value: RawValue) -> Result<bool, DeviceError> {
        match property {
            Property::IsMetronomeEnabled => {
                Ok(self.set_metronome_enabled(expect_bool(property, value)?))
            }
            _ => Err(unknown_property(self.path(), property)),
        }
    }

    fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }
}

#[derive(Debug)]
pub struct Transport {
    is_playing: bool,
    is_stopped: bool,
    is_recording: bool,
    is_rewinding: bool,
    is_fast_forwarding: bool,
    is_repeat_enabled: bool,
    frames: f64,
    beat: f64,
    time: f64,
    notifier: Notifier,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            is_playing: false,
            is_stopped: true,
            is_recording: false,
            is_rewinding: false,
            is_fast_forwarding: false,
            is_repeat_enabled: false,
            frames: 0.0,
            beat: 0.0,
            time: 0.0,
            notifier: Notifier::default(),
        }
    }
}

impl Transport {
    pub fn set_playing(&mut self, v: bool) -> bool {
        assign(&mut self.is_playing, v, &mut self.notifier, Property::IsPlaying)
    }

    pub fn set_stopped(&mut self, v: bool) -> bool {
        assign(&mut self.is_stopped, v, &mut self.notifier, Property::IsStopped)
    }

    pub fn set_recording(&mut self, v: bool) -> bool {
        assign(&mut self.is_recording, v, &mut self.notifier, Property::IsRecording)
    }

    pub fn set_rewinding(&mut self, v: bool) -> bool {
        assign(&mut self.is_rewinding, v, &mut self.notifier, Property::IsRewinding)
    }

    pub fn set_fast_forwarding(&mut self, v: bool) -> bool {
        assign(&mut self.is_fast_forwarding, v, &mut self.notifier, Property::IsFastForwarding)
    }

    pub fn set_repeat_enabled(&mut self, v: bool) -> bool {
        assign(&mut self.is_repeat_enabled, v, &mut self.notifier, Property::IsRepeatEnabled)
    }

    pub fn set_frames(&mut self, v: f64) -> bool {
        assign(&mut self.frames, v, &mut self.notifier, Property::Frames)
    }

    pub fn set_beat(&mut self, v: f64) -> bool {
        assign(&mut self.beat, v, &mut self.notifier, Property::Beat)
    }

    pub fn set_time(&mut self, v: f64) -> bool {
        assign(&mut self.time, v, &mut self.notifier, Property::Time)
    }
}

impl NotifyPropertyChanged for Transport {
    fn path(&self) -> ObjectPath {
        ObjectPath::Transport
    }

    fn property_value(&self, property: Property) -> Option<RawValue> {
        let v = match property {
            Property::IsPlaying => self.is_playing.into(),
            Property::IsStopped => self.is_stopped.into(),
            Property::IsRecording => self.is_recording.into(),
            Property::IsRewinding => self.is_rewinding.into(),
            Property::IsFastForwarding => self.is_fast_forwarding.into(),
            Property::IsRepeatEnabled => self.is_repeat_enabled.into(),
            Property::Frames => self.frames.into(),
            Property::Beat => self.beat.into(),
            Property::Time => self.time.into(),
            _ => return None,
        };
        Some(v)
    }

    fn set_property(&mut self, property: Property, value: RawValue) -> Result<bool, DeviceError> {
        let changed = match property {
            Property::IsPlaying => self.set_playing(expect_bool(property, value)?),
            Property::IsStopped => self.set_stopped(expect_bool(property, value)?),
            Property::IsRecording => self.set_recording(expect_bool(property, value)?),
            Property::IsRewinding => self.set_rewinding(expect_bool(property, value)?),
            Property::IsFastForwarding => self.set_fast_forwarding(expect_bool(property, value)?),
            Property::IsRepeatEnabled => self.set_repeat_enabled(expect_bool(property, value)?),
            Property::Frames => self.set_frames(expect_number(property, value)?),
            Property::Beat => self.set_beat(expect_number(property, value)?),
            Property::Time => self.set_time(expect_number(property, value)?),
            _ => return Err(unknown_property(self.path(), property)),
        };
        Ok(changed)
    }

    fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }
}

#[derive(Debug)]
pub struct Track {
    index: usize,
    name: String,
    is_muted: bool,
    is_soloed: bool,
    is_record_armed: bool,
    is_selected: bool,
    record_monitoring: bool,
    vu: f64,
    volume_db: f64,
    fx: Vec<TrackFx>,
    notifier: Notifier,
}

impl Track {
    fn new(index: usize) -> Self {
        Self {
            index,
            name: String::new(),
            is_muted: false,
            is_soloed: false,
            is_record_armed: false,
            is_selected: false,
            record_monitoring: false,
            vu: 0.0,
            volume_db: 0.0,
            fx: Vec::new(),
            notifier: Notifier::default(),
        }
    }

    pub fn fx(&self, index: usize) -> Option<&TrackFx> {
        self.fx.get(index)
    }

    pub fn fx_mut(&mut self, index: usize) -> Option<&mut TrackFx> {
        self.fx.get_mut(index)
    }

    pub fn push_fx(&mut self) -> &mut TrackFx {
        let fx_index = self.fx.len();
        self.fx.push(TrackFx::new(self.index, fx_index));
        &mut self.fx[fx_index]
    }

    pub fn set_name(&mut self, v: impl Into<String>) -> bool {
        assign(&mut self.name, v.into(), &mut self.notifier, Property::Name)
    }

    pub fn set_muted(&mut self, v: bool) -> bool {
        assign(&mut self.is_muted, v, &mut self.notifier, Property::IsMuted)
    }

    pub fn set_soloed(&mut self, v: bool) -> bool {
        assign(&mut self.is_soloed, v, &mut self.notifier, Property::IsSoloed)
    }

    pub fn set_record_armed(&mut self, v: bool) -> bool {
        assign(&mut self.is_record_armed, v, &mut self.notifier, Property::IsRecordArmed)
    }

    pub fn set_selected(&mut self, v: bool) -> bool {
        assign(&mut self.is_selected, v, &mut self.notifier, Property::IsSelected)
    }

    pub fn set_record_monitoring(&mut self, v: bool) -> bool {
        assign(&mut self.record_monitoring, v, &mut self.notifier, Property::RecordMonitoring)
    }

    pub fn set_vu(&mut self, v: f64) -> bool {
        assign(&mut self.vu, v, &mut self.notifier, Property::Vu)
    }

    pub fn set_volume_db(&mut self, v: f64) -> bool {
        assign(&mut self.volume_db, v, &mut self.notifier, Property::VolumeDb)
    }
}

impl NotifyPropertyChanged for Track {
    fn path(&self) -> ObjectPath {
        ObjectPath::Track(self.index)
    }

    fn property_value(&self, property: Property) -> Option<RawValue> {
        let v = match property {
            Property::Name => self.name.as_str().into(),
            Property::IsMuted => self.is_muted.into(),
            Property::IsSoloed => self.is_soloed.into(),
            Property::IsRecordArmed => self.is_record_armed.into(),
            Property::IsSelected => self.is_selected.into(),
            Property::RecordMonitoring => self.record_monitoring.into(),
            Property::Vu => self.vu.into(),
            Property::VolumeDb => self.volume_db.into(),
            _ => return None,
        };
        Some(v)
    }

    fn set_property(&mut self, property: Property, value: RawValue) -> Result<bool, DeviceError> {
        let changed = match property {
            Property::Name => self.set_name(expect_text(property, value)?),
            Property::IsMuted => self.set_muted(expect_bool(property, value)?),
            Property::IsSoloed => self.set_soloed(expect_bool(property, value)?),
            Property::IsRecordArmed => self.set_record_armed(expect_bool(property, value)?),
            Property::IsSelected => self.set_selected(expect_bool(property, value)?),
            Property::RecordMonitoring => self.set_record_monitoring(expect_bool(property, value)?),
            Property::Vu => self.set_vu(expect_number(property, value)?),
            Property::VolumeDb => self.set_volume_db(expect_number(property, value)?),
            _ => return Err(unknown_property(self.path(), property)),
        };
        Ok(changed)
    }

    fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }
}

#[derive(Debug)]
pub struct TrackFx {
    track_index: usize,
    fx_index: usize,
    name: String,
    is_bypassed: bool,
    is_ui_open: bool,
    notifier: Notifier,
}

impl TrackFx {
    fn new(track_index: usize, fx_index: usize) -> Self {
        Self {
            track_index,
            fx_index,
            name: String::new(),
            is_bypassed: false,
            is_ui_open: false,
            notifier: Notifier::default(),
        }
    }

    pub fn set_name(&mut self, v: impl Into<String>) -> bool {
        assign(&mut self.name, v.into(), &mut self.notifier, Property::Name)
    }

    pub fn set_bypassed(&mut self, v: bool) -> bool {
        assign(&mut self.is_bypassed, v, &mut self.notifier, Property::IsBypassed)
    }

    pub fn set_ui_open(&mut self, v: bool) -> bool {
        assign(&mut self.is_ui_open, v, &mut self.notifier, Property::IsUiOpen)
    }
}

impl NotifyPropertyChanged for TrackFx {
    fn path(&self) -> ObjectPath {
        ObjectPath::Fx(self.track_index, self.fx_index)
    }

    fn property_value(&self, property: Property) -> Option<RawValue> {
        let v = match property {
            Property::Name => self.name.as_str().into(),
            Property::IsBypassed => self.is_bypassed.into(),
            Property::IsUiOpen => self.is_ui_open.into(),
            _ => return None,
        };
        Some(v)
    }

    fn set_property(&mut self, property: Property, value: RawValue) -> Result<bool, DeviceError> {
        let changed = match property {
            Property::Name => self.set_name(expect_text(property, value)?),
            Property::IsBypassed => self.set_bypassed(expect_bool(property, value)?),
            Property::IsUiOpen => self.set_ui_open(expect_bool(property, value)?),
            _ => return Err(unknown_property(self.path(), property)),
        };
        Ok(changed)
    }

    fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }
}
