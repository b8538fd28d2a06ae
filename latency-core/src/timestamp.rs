//! Diffable timestamp rendering.
//!
//! Every time shown in the report table goes through [`TimestampFormatter`],
//! which renders `YYYY/M/D_H:MM:SS.mmm,Z<offsetHours>,D<dstOffsetHours>`.
//!
//! The month is zero-based unless [`MonthBase::One`] is selected; existing
//! operator tooling parses the zero-based form. Offsets are whole hours,
//! truncated toward zero, so a `+05:30` zone prints `Z5`.
//!
//! Time sources sit behind two small traits so scans can be tested with a
//! pinned clock and zone:
//! - [`Clock`] supplies "now" as epoch millis
//! - [`Zone`] maps epoch millis to local calendar fields plus offsets

use chrono::{DateTime, Datelike, FixedOffset, Local, TimeZone, Timelike, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Placeholder rendered when there is no time to show.
pub const NULL_DATE: &str = "null date";

const SECS_PER_HOUR: i32 = 60 * 60;

/// How months are numbered in rendered timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthBase {
    /// January is `0`.
    #[default]
    Zero,
    /// January is `1`.
    One,
}

/// An instant resolved in a particular zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedInstant {
    /// Local calendar time (carries the total UTC offset).
    pub local: DateTime<FixedOffset>,
    /// Standard offset from UTC, in seconds.
    pub zone_offset_secs: i32,
    /// Additional daylight-saving offset in effect, in seconds.
    pub dst_offset_secs: i32,
}

/// Resolves epoch millis to local calendar fields.
pub trait Zone {
    /// Resolve `epoch_millis`, or `None` if it is out of range.
    fn resolve(&self, epoch_millis: i64) -> Option<ZonedInstant>;
}

/// The host's local time zone.
///
/// The standard offset is taken as the smaller of the offsets in effect on
/// January 1 and July 1 of the instant's year; whatever the instant carries
/// beyond that is reported as DST.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalZone;

impl LocalZone {
    fn standard_offset_secs(year: i32) -> Option<i32> {
        let january = Local.with_ymd_and_hms(year, 1, 1, 12, 0, 0).earliest()?;
        let july = Local.with_ymd_and_hms(year, 7, 1, 12, 0, 0).earliest()?;
        Some(
            january
                .offset()
                .local_minus_utc()
                .min(july.offset().local_minus_utc()),
        )
    }
}

impl Zone for LocalZone {
    fn resolve(&self, epoch_millis: i64) -> Option<ZonedInstant> {
        let local = DateTime::<Utc>::from_timestamp_millis(epoch_millis)?.with_timezone(&Local);
        let total = local.offset().local_minus_utc();
        let standard = Self::standard_offset_secs(local.year()).unwrap_or(total);

        Some(ZonedInstant {
            local: local.fixed_offset(),
            zone_offset_secs: standard,
            dst_offset_secs: total - standard,
        })
    }
}

/// A zone with explicit, constant offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedZone {
    zone_offset_secs: i32,
    dst_offset_secs: i32,
}

impl FixedZone {
    /// UTC with no daylight saving.
    pub fn utc() -> Self {
        Self::new(0, 0)
    }

    /// A zone `zone_offset_secs` east of UTC with `dst_offset_secs` of DST.
    pub fn new(zone_offset_secs: i32, dst_offset_secs: i32) -> Self {
        Self {
            zone_offset_secs,
            dst_offset_secs,
        }
    }
}

impl Zone for FixedZone {
    fn resolve(&self, epoch_millis: i64) -> Option<ZonedInstant> {
        let offset = FixedOffset::east_opt(self.zone_offset_secs + self.dst_offset_secs)?;
        let local = DateTime::<Utc>::from_timestamp_millis(epoch_millis)?.with_timezone(&offset);

        Some(ZonedInstant {
            local,
            zone_offset_secs: self.zone_offset_secs,
            dst_offset_secs: self.dst_offset_secs,
        })
    }
}

/// Source of the current wall-clock time.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct FixedClock {
    millis: Arc<AtomicI64>,
}

impl FixedClock {
    /// Create a clock pinned at `epoch_millis`.
    pub fn new(epoch_millis: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(epoch_millis)),
        }
    }

    /// Move the clock to `epoch_millis`.
    pub fn set(&self, epoch_millis: i64) {
        self.millis.store(epoch_millis, Ordering::SeqCst);
    }

    /// Move the clock forward by `millis`.
    pub fn advance(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Renders instants in the report's timestamp format.
#[derive(Debug, Clone)]
pub struct TimestampFormatter<Z: Zone> {
    zone: Z,
    month_base: MonthBase,
}

impl<Z: Zone> TimestampFormatter<Z> {
    /// Create a formatter for `zone` with zero-based months.
    pub fn new(zone: Z) -> Self {
        Self {
            zone,
            month_base: MonthBase::Zero,
        }
    }

    /// Use the given month numbering.
    pub fn with_month_base(mut self, month_base: MonthBase) -> Self {
        self.month_base = month_base;
        self
    }

    /// Render `epoch_millis`, or [`NULL_DATE`] for `None` or an
    /// unrepresentable instant.
    pub fn format_millis(&self, epoch_millis: Option<i64>) -> String {
        let instant = epoch_millis.and_then(|millis| self.zone.resolve(millis));
        format_instant(instant.as_ref(), self.month_base)
    }
}

/// Render an already resolved instant.
pub fn format_instant(instant: Option<&ZonedInstant>, month_base: MonthBase) -> String {
    let Some(instant) = instant else {
        return NULL_DATE.to_string();
    };

    let local = &instant.local;
    let month = match month_base {
        MonthBase::Zero => local.month0(),
        MonthBase::One => local.month(),
    };

    format!(
        "{}/{}/{}_{}:{:02}:{:02}.{:03},Z{},D{}",
        local.year(),
        month,
        local.day(),
        local.hour(),
        local.minute(),
        local.second(),
        local.timestamp_subsec_millis(),
        instant.zone_offset_secs / SECS_PER_HOUR,
        instant.dst_offset_secs / SECS_PER_HOUR,
    )
}
