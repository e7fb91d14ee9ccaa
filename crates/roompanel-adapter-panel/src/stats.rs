//! Statistics aggregation across the panel's endpoints.

use crate::endpoints::{DEVICE_INFO_PATH, EXCHANGE_PATH, MONITORING_PATH};
use crate::error::PanelError;
use crate::session::SessionManager;
use chrono::{DateTime, Utc};
use roompanel_adapter_http::Transport;
use roompanel_core::fields::{
    ACCOUNT_USERNAME, CALENDAR_SYNC_STATUS, EXCHANGE_USERNAME, IDENTITY_FIELDS, MONITORING_FIELDS,
    PANEL_SYNCING, REBOOT,
};
use roompanel_core::{extract_fields, extract_first, is_syncing, ControlKind, FieldMap, Statistics};

/// Collect one statistics snapshot, evaluating sync freshness at `now`.
///
/// Fetches, in order: monitoring status, Exchange account, device identity.
/// Each fetch gets its own retry-once-on-403. The first hard failure aborts
/// the whole collection.
///
/// # Errors
///
/// Returns error if any fetch fails unrecoverably, a response is not a JSON
/// object, or the calendar sync status is missing or unparseable.
pub async fn collect<T>(
    transport: &T,
    session: &SessionManager,
    now: DateTime<Utc>,
) -> Result<Statistics, PanelError>
where
    T: Transport + ?Sized,
{
    let mut stats = Statistics::new();

    let monitoring = fetch_fields(transport, session, MONITORING_PATH, |body| {
        extract_fields(body, MONITORING_FIELDS)
    })
    .await?;
    // A missing status has no timestamp either
    let sync_status = monitoring
        .get(CALENDAR_SYNC_STATUS)
        .map_or("", String::as_str);
    let syncing = is_syncing(sync_status, now)?;
    stats.merge(monitoring);
    stats.insert(PANEL_SYNCING, syncing.to_string());

    let body = session.get(transport, EXCHANGE_PATH).await?;
    let username = extract_first(body.as_bytes(), ACCOUNT_USERNAME).map_err(|source| {
        PanelError::Format {
            path: EXCHANGE_PATH,
            source,
        }
    })?;
    if let Some(username) = username {
        stats.insert(EXCHANGE_USERNAME, username);
    }

    let identity = fetch_fields(transport, session, DEVICE_INFO_PATH, |body| {
        extract_fields(body, IDENTITY_FIELDS)
    })
    .await?;
    stats.merge(identity);

    stats.insert(REBOOT, "0");
    stats.register_control(REBOOT, ControlKind::Push);

    tracing::debug!(
        fields = stats.statistics.len(),
        syncing,
        "Collected panel statistics"
    );

    Ok(stats)
}

async fn fetch_fields<T, X>(
    transport: &T,
    session: &SessionManager,
    path: &'static str,
    extract: X,
) -> Result<FieldMap, PanelError>
where
    T: Transport + ?Sized,
    X: FnOnce(&[u8]) -> Result<FieldMap, roompanel_core::FormatError>,
{
    let body = session.get(transport, path).await?;
    extract(body.as_bytes()).map_err(|source| PanelError::Format { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::LOGIN_PATH;
    use crate::mock::{forbidden, server_error, Call, MockTransport};
    use crate::session::Credentials;
    use chrono::{Duration, TimeZone};
    use roompanel_adapter_http::ClientError;
    use roompanel_core::fields::is_snapshot_key;
    use roompanel_core::{FormatError, FreshnessError};

    const MONITORING: &str = r#"{"ConnectionStatus":"Online","CalendarSyncStatus":"Last synced 02:15 PM - November 04, 2024","ConnectionStatusMessage":"OK","State":"Active","Uptime":"3 days"}"#;
    const EXCHANGE: &str = r#"{"Username":"svc-room1","Password":"hidden","Server":"outlook.office365.com"}"#;
    const DEVICE_INFO: &str = r#"{"PufVersion":"1.2","MacAddress":"AA:BB:CC:DD:EE:FF","SerialNumber":"SN123","DeviceName":"Room1","BuildDate":"2023-01-01","Model":"TSS-770"}"#;

    fn synced_at() -> DateTime<Utc> {
        chrono_tz::Australia::Melbourne
            .with_ymd_and_hms(2024, 11, 4, 14, 15, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn session() -> SessionManager {
        SessionManager::new(Credentials::new("admin", "secret"))
    }

    fn healthy_panel() -> MockTransport {
        let transport = MockTransport::new();
        transport.respond(MONITORING_PATH, Ok(MONITORING.to_string()));
        transport.respond(EXCHANGE_PATH, Ok(EXCHANGE.to_string()));
        transport.respond(DEVICE_INFO_PATH, Ok(DEVICE_INFO.to_string()));
        transport.respond(LOGIN_PATH, Ok(String::new()));
        transport
    }

    #[tokio::test]
    async fn end_to_end_snapshot() {
        let transport = healthy_panel();
        let now = synced_at() + Duration::minutes(20);

        let stats = collect(&transport, &session(), now).await.unwrap();

        assert_eq!(stats.get("PanelSyncing"), Some("false"));
        assert_eq!(stats.get("ExchangeUsername"), Some("svc-room1"));
        assert_eq!(stats.get("reboot"), Some("0"));
        assert_eq!(stats.get("ConnectionStatus"), Some("Online"));
        assert_eq!(
            stats.get("CalendarSyncStatus"),
            Some("Last synced 02:15 PM - November 04, 2024")
        );
        assert_eq!(stats.get("ConnectionStatusMessage"), Some("OK"));
        assert_eq!(stats.get("State"), Some("Active"));
        assert_eq!(stats.get("PufVersion"), Some("1.2"));
        assert_eq!(stats.get("MacAddress"), Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(stats.get("SerialNumber"), Some("SN123"));
        assert_eq!(stats.get("DeviceName"), Some("Room1"));
        assert_eq!(stats.get("BuildDate"), Some("2023-01-01"));
        assert_eq!(stats.statistics.len(), 12);
        assert_eq!(stats.controls.len(), 1);
        assert_eq!(stats.controls.get("reboot"), Some(&ControlKind::Push));
    }

    #[tokio::test]
    async fn snapshot_keys_stay_within_whitelists() {
        let transport = healthy_panel();

        let stats = collect(&transport, &session(), synced_at()).await.unwrap();

        assert!(stats.statistics.keys().all(|key| is_snapshot_key(key)));
        assert!(stats.get("Uptime").is_none());
        assert!(stats.get("Password").is_none());
        assert!(stats.get("Username").is_none());
    }

    #[tokio::test]
    async fn fresh_sync_reports_syncing() {
        let transport = healthy_panel();
        let now = synced_at() + Duration::minutes(12) - Duration::seconds(1);

        let stats = collect(&transport, &session(), now).await.unwrap();

        assert_eq!(stats.get("PanelSyncing"), Some("true"));
    }

    #[tokio::test]
    async fn fetches_run_in_order_without_login() {
        let transport = healthy_panel();

        collect(&transport, &session(), synced_at()).await.unwrap();

        assert_eq!(
            transport.calls(),
            vec![
                Call::get(MONITORING_PATH),
                Call::get(EXCHANGE_PATH),
                Call::get(DEVICE_INFO_PATH),
            ]
        );
    }

    #[tokio::test]
    async fn expiry_mid_poll_retries_only_that_fetch() {
        let transport = MockTransport::new();
        transport.respond(MONITORING_PATH, Ok(MONITORING.to_string()));
        transport.respond(EXCHANGE_PATH, Err(forbidden()));
        transport.respond(EXCHANGE_PATH, Ok(EXCHANGE.to_string()));
        transport.respond(DEVICE_INFO_PATH, Ok(DEVICE_INFO.to_string()));
        transport.respond(LOGIN_PATH, Ok(String::new()));

        let stats = collect(&transport, &session(), synced_at()).await.unwrap();

        assert_eq!(stats.get("ExchangeUsername"), Some("svc-room1"));
        assert_eq!(
            transport.calls(),
            vec![
                Call::get(MONITORING_PATH),
                Call::get(EXCHANGE_PATH),
                Call::post(LOGIN_PATH),
                Call::get(EXCHANGE_PATH),
                Call::get(DEVICE_INFO_PATH),
            ]
        );
    }

    #[tokio::test]
    async fn failure_on_last_fetch_returns_nothing() {
        let transport = MockTransport::new();
        transport.respond(MONITORING_PATH, Ok(MONITORING.to_string()));
        transport.respond(EXCHANGE_PATH, Ok(EXCHANGE.to_string()));
        transport.respond(DEVICE_INFO_PATH, Err(server_error()));

        let result = collect(&transport, &session(), synced_at()).await;

        assert_eq!(result, Err(PanelError::Transport(server_error())));
    }

    #[tokio::test]
    async fn network_failure_aborts() {
        let transport = MockTransport::new();
        transport.respond(
            MONITORING_PATH,
            Err(ClientError::Request("connection refused".to_string())),
        );

        let err = collect(&transport, &session(), synced_at())
            .await
            .unwrap_err();

        assert!(matches!(err, PanelError::Transport(ClientError::Request(_))));
        assert_eq!(transport.count(EXCHANGE_PATH), 0);
    }

    #[tokio::test]
    async fn non_object_response_is_format_error() {
        let transport = MockTransport::new();
        transport.respond(MONITORING_PATH, Ok(MONITORING.to_string()));
        transport.respond(EXCHANGE_PATH, Ok(EXCHANGE.to_string()));
        transport.respond(DEVICE_INFO_PATH, Ok("[]".to_string()));

        let err = collect(&transport, &session(), synced_at())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PanelError::Format {
                path: DEVICE_INFO_PATH,
                source: FormatError::NotAnObject,
            }
        );
    }

    #[tokio::test]
    async fn html_response_is_format_error() {
        let transport = MockTransport::new();
        transport.respond(MONITORING_PATH, Ok(MONITORING.to_string()));
        transport.respond(EXCHANGE_PATH, Ok("<html>login</html>".to_string()));

        let err = collect(&transport, &session(), synced_at())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PanelError::Format {
                path: EXCHANGE_PATH,
                source: FormatError::Malformed(_)
            }
        ));
        assert_eq!(transport.count(DEVICE_INFO_PATH), 0);
    }

    #[tokio::test]
    async fn missing_sync_status_is_fatal() {
        let transport = MockTransport::new();
        transport.respond(MONITORING_PATH, Ok(r#"{"State":"Active"}"#.to_string()));

        let err = collect(&transport, &session(), synced_at())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PanelError::Freshness(FreshnessError::MissingTimestamp(_))
        ));
        assert_eq!(transport.count(EXCHANGE_PATH), 0);
    }

    #[tokio::test]
    async fn malformed_sync_status_is_fatal() {
        let transport = MockTransport::new();
        transport.respond(
            MONITORING_PATH,
            Ok(r#"{"CalendarSyncStatus":"Last synced yesterday afternoon"}"#.to_string()),
        );

        let err = collect(&transport, &session(), synced_at())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PanelError::Freshness(FreshnessError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn missing_username_is_omitted() {
        let transport = MockTransport::new();
        transport.respond(MONITORING_PATH, Ok(MONITORING.to_string()));
        transport.respond(EXCHANGE_PATH, Ok(r#"{"Server":"mail"}"#.to_string()));
        transport.respond(DEVICE_INFO_PATH, Ok(DEVICE_INFO.to_string()));

        let stats = collect(&transport, &session(), synced_at()).await.unwrap();

        assert!(stats.get("ExchangeUsername").is_none());
        assert_eq!(stats.get("DeviceName"), Some("Room1"));
    }
}
