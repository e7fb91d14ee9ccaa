//! # Room Panel CLI
//!
//! One-shot utilities for checking and controlling a room booking panel.

use anyhow::{Context, Result};
use chrono::Utc;
use roompanel_adapter_http::{HttpTransport, HttpTransportConfig};
use roompanel_adapter_panel::{ControlOutcome, ControlRequest, Credentials, RoomPanel};
use roompanel_core::freshness::SYNC_STATUS_PREFIX;
use roompanel_core::{is_stale, is_syncing};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "stats" => {
            let panel = connect(&args, "stats <host>")?;
            let stats = panel.collect().await.context("Failed to collect statistics")?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        "reboot" => {
            let panel = connect(&args, "reboot <host>")?;
            let outcome = panel
                .dispatch(&ControlRequest::new("reboot"))
                .await
                .context("Failed to send reboot")?;
            match outcome {
                ControlOutcome::Applied => println!("reboot accepted"),
                ControlOutcome::SoftFailure { response } => {
                    println!("reboot sent, panel did not confirm: {response}");
                }
                ControlOutcome::Ignored | ControlOutcome::Failed(_) => {
                    println!("reboot not sent: {outcome:?}");
                }
            }
        }
        "ping" => {
            let panel = connect(&args, "ping <host>")?;
            let rtt = panel.ping().await.context("Panel unreachable")?;
            println!("{} ms", rtt.as_millis());
        }
        "sync-check" => {
            if args.len() < 3 {
                eprintln!("Usage: roompanel sync-check <calendar sync status>");
                std::process::exit(1);
            }
            let text = args[2..].join(" ");
            let now = Utc::now();
            // Accept the full status or just its timestamp
            let syncing = if text.starts_with(SYNC_STATUS_PREFIX) {
                is_syncing(&text, now)
            } else {
                is_stale(&text, now).map(|stale| !stale)
            }
            .context("Failed to evaluate sync status")?;
            println!("{}", if syncing { "syncing" } else { "stale" });
        }
        "help" | "--help" | "-h" => {
            print_help();
        }
        cmd => {
            eprintln!("Unknown command: {cmd}");
            print_help();
            std::process::exit(1);
        }
    }

    Ok(())
}

fn connect(args: &[String], usage: &str) -> Result<RoomPanel<HttpTransport>> {
    let Some(host) = args.get(2) else {
        eprintln!("Usage: roompanel {usage}");
        std::process::exit(1);
    };

    let credentials = Credentials::new(
        env::var("ROOMPANEL_USERNAME").unwrap_or_default(),
        env::var("ROOMPANEL_PASSWORD").unwrap_or_default(),
    );

    let transport = HttpTransport::new(HttpTransportConfig {
        host: host.clone(),
        ..Default::default()
    })
    .context("Failed to create panel transport")?;

    Ok(RoomPanel::new(transport, credentials))
}

fn print_help() {
    println!(
        r#"Room Panel CLI

USAGE:
    roompanel <COMMAND> [OPTIONS]

COMMANDS:
    stats <host>             Collect and print a statistics snapshot as JSON
    reboot <host>            Reboot the panel
    ping <host>              Measure TCP connect time to the panel
    sync-check <status>      Check whether a calendar sync status is fresh now
    help                     Show this help message

ENVIRONMENT:
    ROOMPANEL_USERNAME       Panel login name
    ROOMPANEL_PASSWORD       Panel login password
    RUST_LOG                 Log filter (default: warn)

EXAMPLES:
    roompanel stats panel.local
    roompanel sync-check "Last synced 02:15 PM - November 04, 2024"
"#
    );
}
