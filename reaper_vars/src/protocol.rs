pub const INBOUND_CAP: usize = 256;

pub use reaper_vars_protocol::{
    DeviceEvent, DisplayValue, ObjectPath, Property, RawValue, SinkMessage, VariableDeclaration,
};
