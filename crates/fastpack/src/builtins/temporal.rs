//! chrono date and time types.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::registry::Builtin;
use crate::{FieldError, Fields, Registrable};

/// RFC 3339 for years 0..=9999; other years keep their sign and width.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";
const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";

const NANOS_PER_SEC: i64 = 1_000_000_000;

fn iso(fields: &mut Fields) -> Result<String, FieldError> {
    fields.take_str("iso")
}

impl Registrable for DateTime<FixedOffset> {
    fn encode(&self) -> Fields {
        Fields::new().with("iso", self.format(DATETIME_FORMAT).to_string())
    }

    fn decode(mut fields: Fields) -> Result<Self, FieldError> {
        let iso = iso(&mut fields)?;
        DateTime::parse_from_str(&iso, DATETIME_FORMAT)
            .map_err(|err| FieldError::invalid("iso", err))
    }
}

impl Builtin for DateTime<FixedOffset> {
    const TAG: &'static str = "datetime";
}

impl Registrable for NaiveDateTime {
    fn encode(&self) -> Fields {
        Fields::new().with("iso", self.format(NAIVE_DATETIME_FORMAT).to_string())
    }

    fn decode(mut fields: Fields) -> Result<Self, FieldError> {
        let iso = iso(&mut fields)?;
        NaiveDateTime::parse_from_str(&iso, NAIVE_DATETIME_FORMAT)
            .map_err(|err| FieldError::invalid("iso", err))
    }
}

impl Builtin for NaiveDateTime {
    const TAG: &'static str = "naive_datetime";
}

impl Registrable for NaiveDate {
    fn encode(&self) -> Fields {
        Fields::new().with("iso", self.format(DATE_FORMAT).to_string())
    }

    fn decode(mut fields: Fields) -> Result<Self, FieldError> {
        let iso = iso(&mut fields)?;
        NaiveDate::parse_from_str(&iso, DATE_FORMAT).map_err(|err| FieldError::invalid("iso", err))
    }
}

impl Builtin for NaiveDate {
    const TAG: &'static str = "date";
}

impl Registrable for NaiveTime {
    fn encode(&self) -> Fields {
        Fields::new().with("iso", self.format(TIME_FORMAT).to_string())
    }

    fn decode(mut fields: Fields) -> Result<Self, FieldError> {
        let iso = iso(&mut fields)?;
        NaiveTime::parse_from_str(&iso, TIME_FORMAT).map_err(|err| FieldError::invalid("iso", err))
    }
}

impl Builtin for NaiveTime {
    const TAG: &'static str = "time";
}

/// Whole seconds plus a same-signed nanosecond remainder.
impl Registrable for TimeDelta {
    fn encode(&self) -> Fields {
        Fields::new()
            .with("seconds", self.num_seconds())
            .with("nanoseconds", self.subsec_nanos())
    }

    fn decode(mut fields: Fields) -> Result<Self, FieldError> {
        let seconds = fields.take_i64("seconds")?;
        let nanos = fields.take_i64("nanoseconds")?;
        if nanos.abs() >= NANOS_PER_SEC {
            return Err(FieldError::invalid(
                "nanoseconds",
                format!("{nanos} is not below one second"),
            ));
        }
        TimeDelta::try_seconds(seconds)
            .and_then(|delta| delta.checked_add(&TimeDelta::nanoseconds(nanos)))
            .ok_or_else(|| FieldError::invalid("seconds", format!("{seconds}s is out of range")))
    }
}

impl Builtin for TimeDelta {
    const TAG: &'static str = "timedelta";
}
