//! REST paths and fixed payloads of the panel API.

use serde_json::{json, Value};

/// Login form target.
pub const LOGIN_PATH: &str = "/userlogin.html";

/// Scheduling panel monitoring status.
pub const MONITORING_PATH: &str = "/Device/SchedulingPanel/Monitoring";

/// Exchange calendar account configuration.
pub const EXCHANGE_PATH: &str = "/Device/SchedulingPanel/Config/Scheduling/Exchange";

/// Device identity.
pub const DEVICE_INFO_PATH: &str = "/Device/DeviceInfo/";

/// Device operations (reboot and friends).
pub const DEVICE_OPERATIONS_PATH: &str = "/Device/DeviceOperations";

/// Token a successful device operation response contains.
pub const OPERATION_SUCCESS_MARKER: &str = "OK";

/// Command body requesting a reboot.
#[must_use]
pub fn reboot_command() -> Value {
    json!({ "Device": { "DeviceOperations": { "Reboot": true } } })
}
