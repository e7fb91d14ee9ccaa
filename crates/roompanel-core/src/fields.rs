//! Field names of the panel's REST endpoints and of the derived snapshot entries.

use crate::extract::FieldWhitelist;

/// Fields kept from the scheduling panel monitoring endpoint.
pub const MONITORING_FIELDS: FieldWhitelist = FieldWhitelist::new(&[
    CALENDAR_SYNC_STATUS,
    "ConnectionStatus",
    "ConnectionStatusMessage",
    "State",
]);

/// Field read from the Exchange account configuration endpoint.
pub const ACCOUNT_USERNAME: &str = "Username";

/// Fields kept from the device identity endpoint.
pub const IDENTITY_FIELDS: FieldWhitelist = FieldWhitelist::new(&[
    "PufVersion",
    "MacAddress",
    "SerialNumber",
    "DeviceName",
    "BuildDate",
]);

/// Monitoring field holding the human readable calendar sync status.
pub const CALENDAR_SYNC_STATUS: &str = "CalendarSyncStatus";

/// Snapshot key for the account username, renamed from [`ACCOUNT_USERNAME`].
pub const EXCHANGE_USERNAME: &str = "ExchangeUsername";

/// Derived snapshot key: `"true"` while the calendar sync is fresh.
pub const PANEL_SYNCING: &str = "PanelSyncing";

/// Static snapshot key and control name of the reboot action.
pub const REBOOT: &str = "reboot";

/// Whether `key` may appear in a statistics snapshot.
#[must_use]
pub fn is_snapshot_key(key: &str) -> bool {
    MONITORING_FIELDS.contains(key)
        || IDENTITY_FIELDS.contains(key)
        || matches!(key, EXCHANGE_USERNAME | PANEL_SYNCING | REBOOT)
}
