use crate::error::LocateError;
use crate::notify::NotifyPropertyChanged;
use crate::protocol::{ObjectPath, Property, RawValue};
use crate::reaper_state::Reaper;
use serde::Serialize;

/// Names one property on one object of the graph. Indices are fixed when the
/// locator is built and resolved by direct indexing on every use.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyLocator {
    pub object: ObjectPath,
    pub property: Property,
}

impl PropertyLocator {
    pub fn root(property: Property) -> Self {
        Self {
            object: ObjectPath::Root,
            property,
        }
    }

    pub fn transport(property: Property) -> Self {
        Self {
            object: ObjectPath::Transport,
            property,
        }
    }

    pub fn track(track: usize, property: Property) -> Self {
        Self {
            object: ObjectPath::Track(track),
            property,
        }
    }

    pub fn fx(track: usize, fx: usize, property: Property) -> Self {
        Self {
            object: ObjectPath::Fx(track, fx),
            property,
        }
    }

    pub fn resolve_mut<'a>(
        &self,
        root: &'a mut Reaper,
    ) -> Result<&'a mut dyn NotifyPropertyChanged, LocateError> {
        let item = resolve_path_mut(root, self.object)?;
        self.check(&*item)?;
        Ok(item)
    }

    /// Reads the current raw value of the located property.
    pub fn read(&self, root: &Reaper) -> Result<RawValue, LocateError> {
        let item = resolve_path(root, self.object)?;
        item.property_value(self.property)
            .ok_or(LocateError::UnknownProperty {
                path: self.object,
                property: self.property,
            })
    }

    fn check(&self, item: &dyn NotifyPropertyChanged) -> Result<(), LocateError> {
        if item.property_value(self.property).is_none() {
            return Err(LocateError::UnknownProperty {
                path: self.object,
                property: self.property,
            });
        }
        Ok(())
    }
}

pub fn resolve_path(root: &Reaper, path: ObjectPath) -> Result<&dyn NotifyPropertyChanged, LocateError> {
    match path {
        ObjectPath::Root => Ok(root),
        ObjectPath::Transport => Ok(root.transport()),
        ObjectPath::Track(t) => {
            let track = root.track(t).ok_or(LocateError::TrackMissing(t))?;
            Ok(track)
        }
        ObjectPath::Fx(t, fx) => {
            let track = root.track(t).ok_or(LocateError::TrackMissing(t))?;
            let item = track.fx(fx).ok_or(LocateError::FxMissing { track: t, fx })?;
            Ok(item)
        }
    }
}

pub fn resolve_path_mut(
    root: &mut Reaper,
    path: ObjectPath,
) -> Result<&mut dyn NotifyPropertyChanged, LocateError> {
    match path {
        ObjectPath::Root => Ok(root),
        ObjectPath::Transport => Ok(root.transport_mut()),
        ObjectPath::Track(t) => {
            let track = root.track_mut(t).ok_or(LocateError::TrackMissing(t))?;
            Ok(track)
        }
        ObjectPath::Fx(t, fx) => {
            let track = root.track_mut(t).ok_or(LocateError::TrackMissing(t))?;
            let item = track
                .fx_mut(fx)
                .ok_or(LocateError::FxMissing { track: t, fx })?;
            Ok(item)
        }
    }
}
