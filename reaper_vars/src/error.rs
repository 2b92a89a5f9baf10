use crate::protocol::{ObjectPath, Property};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocateError {
    #[error("no track at index {0} (graph is smaller than the configured cardinality)")]
    TrackMissing(usize),
    #[error("no fx at index {fx} on track {track} (graph is smaller than the configured cardinality)")]
    FxMissing { track: usize, fx: usize },
    #[error("{path} has no property {property}")]
    UnknownProperty { path: ObjectPath, property: Property },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("expected {expected}, got {got}")]
    WrongKind {
        expected: &'static str,
        got: &'static str,
    },
    #[error("non-finite number: {0}")]
    NonFinite(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecomputeError {
    #[error(transparent)]
    Locate(#[from] LocateError),
    #[error(transparent)]
    Transform(#[from] TransformError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeviceError {
    #[error(transparent)]
    Locate(#[from] LocateError),
    #[error("{property} expects a {expected} value, got {got}")]
    WrongKind {
        property: Property,
        expected: &'static str,
        got: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BinderError {
    #[error("binder is already bound")]
    AlreadyBound,
    #[error("binder is not bound")]
    NotBound,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("invalid value for {var}: {value:?}")]
    BadEnv { var: &'static str, value: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}
