//! # ircle
//!
//! Minimal interactive IRC client. Every received line is printed to
//! stdout; every line typed on stdin is sent as-is. `QUIT` ends the
//! session.
//!
//! ## Usage
//!
//! ```bash
//! # Connect with default settings
//! ircle
//!
//! # Use a settings file
//! ircle /path/to/ircle.toml
//!
//! # Override server and nickname
//! IRCLE_HOST=irc.libera.chat IRCLE_NICK=Twoflower ircle
//! ```

mod settings;

use anyhow::{Context, Result};
use ircle_client::command::ALL_MESSAGES;
use ircle_client::{metrics, Client, Message};
use settings::Settings;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load settings
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load()?,
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Initialize metrics
    metrics::describe_metrics();
    if settings.metrics.enabled {
        if let Err(e) = metrics::start_metrics_server(settings.metrics.port) {
            error!("Failed to start metrics server: {:#}", e);
        }
    }

    let client = Client::new(settings.session.clone());
    client.on_message(ALL_MESSAGES, |msg: &Message| println!("{}", msg.raw));
    client.on_network_error(|description| warn!("{}", description));

    info!(
        "Connecting to {}:{} as {}",
        settings.server.host, settings.server.port, settings.identity.nickname
    );

    let mut session = {
        let client = client.clone();
        let info = settings.registration();
        let host = settings.server.host.clone();
        let port = settings.server.port;
        tokio::spawn(async move { client.connect(&host, port, &info).await })
    };

    let sender = client.sender();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            result = &mut session => {
                return result.context("Session task panicked")?.context("Session ended");
            }
            line = stdin.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    // stdin closed
                    if let Err(e) = sender.close() {
                        warn!("Cannot close session: {}", e);
                    }
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                if let Err(e) = sender.send_raw(&line) {
                    warn!("Not sent: {}", e);
                }
                if is_quit(&line) {
                    break;
                }
            }
        }
    }

    session
        .await
        .context("Session task panicked")?
        .context("Session ended")
}

fn is_quit(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|verb| verb.eq_ignore_ascii_case("QUIT"))
}
