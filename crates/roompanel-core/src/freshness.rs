//! Calendar sync freshness.
//!
//! The panel reports its last Exchange sync as text such as
//! `"Last synced 02:15 PM - November 04, 2024"`, written in the panel's local
//! time (Australian Eastern) whatever timezone this host runs in. A sync is
//! fresh for [`SYNC_GRACE_MINUTES`] after that instant; at exactly the end of
//! the window it is already stale.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Fixed text preceding the timestamp in the calendar sync status.
pub const SYNC_STATUS_PREFIX: &str = "Last synced ";

/// Byte offset of the timestamp inside the calendar sync status.
///
/// Coupled to [`SYNC_STATUS_PREFIX`]; the prefix itself is not checked.
pub const SYNC_TIMESTAMP_OFFSET: usize = SYNC_STATUS_PREFIX.len();

/// `chrono` format of the sync timestamp, e.g. `02:15 PM - November 04, 2024`.
pub const SYNC_TIMESTAMP_FORMAT: &str = "%I:%M %p - %B %d, %Y";

/// Timezone the panel writes its timestamps in.
pub const PANEL_TIMEZONE: Tz = chrono_tz::Australia::Melbourne;

/// Minutes after the last sync during which the panel counts as syncing.
pub const SYNC_GRACE_MINUTES: i64 = 12;

/// Length of the panel timezone's daylight saving jump.
pub const DAYLIGHT_SAVING_SHIFT_MINUTES: i64 = 60;

/// Locate the timestamp inside a calendar sync status.
///
/// # Errors
///
/// Returns [`FreshnessError::MissingTimestamp`] if the status is too short to
/// hold anything past the prefix.
pub fn sync_timestamp(status: &str) -> Result<&str, FreshnessError> {
    status
        .get(SYNC_TIMESTAMP_OFFSET..)
        .filter(|rest| !rest.is_empty())
        .ok_or_else(|| FreshnessError::MissingTimestamp(status.to_string()))
}

/// Parse a sync timestamp in the panel's timezone.
///
/// Wall-clock times repeated by a daylight saving change resolve to the
/// earlier instant. Times skipped by the change move forward across the
/// [`DAYLIGHT_SAVING_SHIFT_MINUTES`] gap, so `02:30 AM` on the night clocks
/// jump from 2:00 to 3:00 reads as `03:30 AM` daylight time.
///
/// # Errors
///
/// Returns error if the text does not match [`SYNC_TIMESTAMP_FORMAT`] exactly
/// or cannot be placed on the panel's timeline.
pub fn parse_sync_timestamp(timestamp: &str) -> Result<DateTime<Tz>, FreshnessError> {
    let naive = NaiveDateTime::parse_from_str(timestamp, SYNC_TIMESTAMP_FORMAT).map_err(|source| {
        FreshnessError::Parse {
            input: timestamp.to_string(),
            source,
        }
    })?;

    if let Some(local) = PANEL_TIMEZONE.from_local_datetime(&naive).earliest() {
        return Ok(local);
    }

    let shifted = naive
        .checked_add_signed(Duration::minutes(DAYLIGHT_SAVING_SHIFT_MINUTES))
        .ok_or_else(|| FreshnessError::OutOfRange(timestamp.to_string()))?;

    PANEL_TIMEZONE
        .from_local_datetime(&shifted)
        .earliest()
        .ok_or_else(|| FreshnessError::NonexistentLocalTime(timestamp.to_string()))
}

/// Whether a sync at `timestamp` is stale at `now`.
///
/// Stale once `now` reaches the sync time plus [`SYNC_GRACE_MINUTES`].
///
/// # Errors
///
/// Returns error if the timestamp cannot be parsed.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use roompanel_core::is_stale;
///
/// // 02:15 PM AEDT is 03:15 UTC
/// let now = Utc.with_ymd_and_hms(2024, 11, 4, 3, 20, 0).unwrap();
/// assert!(!is_stale("02:15 PM - November 04, 2024", now).unwrap());
/// ```
pub fn is_stale(timestamp: &str, now: DateTime<Utc>) -> Result<bool, FreshnessError> {
    let last_sync = parse_sync_timestamp(timestamp)?;
    let threshold = last_sync
        .checked_add_signed(Duration::minutes(SYNC_GRACE_MINUTES))
        .ok_or_else(|| FreshnessError::OutOfRange(timestamp.to_string()))?;

    Ok(now >= threshold.with_timezone(&Utc))
}

/// Whether a calendar sync status reports a fresh sync at `now`.
///
/// # Errors
///
/// Returns error if no timestamp can be located or parsed in `status`.
pub fn is_syncing(status: &str, now: DateTime<Utc>) -> Result<bool, FreshnessError> {
    let timestamp = sync_timestamp(status)?;
    let stale = is_stale(timestamp, now)?;
    tracing::trace!(timestamp, stale, "Evaluated calendar sync freshness");
    Ok(!stale)
}

/// Errors raised while evaluating calendar sync freshness.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FreshnessError {
    /// No timestamp follows the status prefix
    #[error("calendar sync status holds no timestamp: {0:?}")]
    MissingTimestamp(String),
    /// Timestamp does not match the expected format
    #[error("unparseable sync timestamp {input:?}: {source}")]
    Parse {
        /// Offending text
        input: String,
        /// Underlying parse failure
        source: chrono::ParseError,
    },
    /// Timestamp names a time that does not exist in the panel timezone
    #[error("sync timestamp {0:?} does not exist in the panel timezone")]
    NonexistentLocalTime(String),
    /// Timestamp is too close to the end of the supported calendar
    #[error("sync timestamp {0:?} is out of range")]
    OutOfRange(String),
}
