//! Extension types every [`Registry::with_builtins`] registry knows about,
//! packed under the `__ext__` marker.
//!
//! | tag              | type                                | fields                     |
//! |------------------|-------------------------------------|----------------------------|
//! | `datetime`       | `chrono::DateTime<FixedOffset>`     | `iso` (RFC 3339)           |
//! | `naive_datetime` | `chrono::NaiveDateTime`             | `iso`                      |
//! | `date`           | `chrono::NaiveDate`                 | `iso`                      |
//! | `time`           | `chrono::NaiveTime`                 | `iso`                      |
//! | `timedelta`      | `chrono::TimeDelta`                 | `seconds`, `nanoseconds`   |
//! | `decimal`        | [`Decimal`]                         | `value`                    |
//! | `uuid`           | `uuid::Uuid`                        | `bytes` (16 raw bytes)     |
//! | `set`            | [`Set`]                             | `items`                    |
//! | `tuple`          | [`Tuple`]                           | `items`                    |

mod collections;
mod decimal;
mod identity;
mod temporal;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use uuid::Uuid;

use crate::Registry;

pub use collections::{Set, Tuple};
pub use decimal::{Decimal, ParseDecimalError};

pub(crate) fn install(registry: &mut Registry) {
    registry.register_builtin::<DateTime<FixedOffset>>();
    registry.register_builtin::<NaiveDateTime>();
    registry.register_builtin::<NaiveDate>();
    registry.register_builtin::<NaiveTime>();
    registry.register_builtin::<TimeDelta>();
    registry.register_builtin::<Decimal>();
    registry.register_builtin::<Uuid>();
    registry.register_builtin::<Set>();
    registry.register_builtin::<Tuple>();
}
