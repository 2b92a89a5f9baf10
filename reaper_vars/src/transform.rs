use crate::error::TransformError;
use crate::protocol::{DisplayValue, RawValue};
use serde::Serialize;

/// Silence floor for the VU meter in decibels.
pub const VU_SILENCE_DB: f64 = -60.0;

/// Exponent of the VU to dB curve. Linear for now.
pub const VU_CURVE_POWER: f64 = 1.0;

/// Maps a raw property value to what the consumer displays.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Transform {
    /// Boolean to one of two labels.
    Label {
        on: &'static str,
        off: &'static str,
    },
    /// Value handed through unchanged.
    Identity,
    /// Elapsed seconds as `h:mm:ss.sss` / `m:ss.sss`.
    Time,
    VuPercent,
    VuDb,
    VolumeDb,
}

impl Transform {
    pub fn apply(&self, raw: RawValue) -> Result<DisplayValue, TransformError> {
        match self {
            Transform::Label { on, off } => {
                let v = as_bool(&raw)?;
                Ok(DisplayValue::from(if v { *on } else { *off }))
            }
            Transform::Identity => Ok(raw.into()),
            Transform::Time => Ok(DisplayValue::Text(format_time(as_number(&raw)?))),
            Transform::VuPercent => Ok(vu_percent(as_number(&raw)?).into()),
            Transform::VuDb => Ok(vu_to_db(as_number(&raw)?).into()),
            Transform::VolumeDb => Ok(volume_db(as_number(&raw)?).into()),
        }
    }
}

/// Applies an optional transform; no transform passes the raw value through.
pub fn display_value(
    transform: Option<&Transform>,
    raw: RawValue,
) -> Result<DisplayValue, TransformError> {
    match transform {
        Some(t) => t.apply(raw),
        None => Ok(raw.into()),
    }
}

pub fn format_time(seconds_total: f64) -> String {
    let hours = (seconds_total / 3600.0).floor();
    let minutes = ((seconds_total / 60.0) % 60.0).floor();
    let seconds = seconds_total % 60.0;

    if hours > 0.0 {
        format!("{}:{:02}:{}", hours as i64, minutes as i64, format_seconds(seconds))
    } else {
        format!("{}:{}", minutes as i64, format_seconds(seconds))
    }
}

/// `ss.sss`, zero padded, with exact halves of a millisecond rounded up.
///
/// `{:.3}` rounds exact ties to even. A double sits exactly halfway between
/// two milliseconds only when it is an odd multiple of 1/16, and scaling by 16
/// is exact, so those are detected and rounded up by hand.
fn format_seconds(seconds: f64) -> String {
    let sixteenths = seconds * 16.0;
    if sixteenths.fract() == 0.0 && sixteenths % 2.0 == 1.0 {
        let millis = (sixteenths * 62.5).ceil() as u64;
        return format!("{:02}.{:03}", millis / 1000, millis % 1000);
    }
    format!("{seconds:06.3}")
}

/// VU reading as a percentage with one decimal.
pub fn vu_percent(vu: f64) -> f64 {
    round_half_up(vu * 1000.0) / 10.0
}

pub fn vu_to_db(vu: f64) -> f64 {
    if vu <= 0.0 {
        return VU_SILENCE_DB;
    }
    let db = 12.0 + -72.0 * (1.0 - vu.powf(VU_CURVE_POWER));
    round_half_up(db * 10.0) / 10.0
}

pub fn volume_db(db: f64) -> f64 {
    round_half_up(db * 10.0) / 10.0
}

// Halves round toward +inf, so -60.5 becomes -60 rather than -61.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn as_bool(raw: &RawValue) -> Result<bool, TransformError> {
    match raw {
        RawValue::Bool(b) => Ok(*b),
        other => Err(TransformError::WrongKind {
            expected: "bool",
            got: other.kind(),
        }),
    }
}

fn as_number(raw: &RawValue) -> Result<f64, TransformError> {
    match raw {
        RawValue::Number(n) if n.is_finite() => Ok(*n),
        RawValue::Number(n) => Err(TransformError::NonFinite(*n)),
        other => Err(TransformError::WrongKind {
            expected: "number",
            got: other.kind(),
        }),
    }
}
