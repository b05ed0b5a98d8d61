use std::process::ExitCode;

use clap::Parser;
use pixelboard::command::parse_command;
use pixelboard::config::{ClientConfig, ConfigError, Transport};
use pixelboard::connection;
use pixelboard::events::{EventSender, SessionEvent, UiEvent};
use pixelboard::login::{self, LoginError};
use pixelboard::session::Session;
use pixelboard::surface::TraceSurface;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Login(#[from] LoginError),
}

#[derive(Parser, Debug)]
#[command(name = "pixelboard", about = "Shared pixel board client")]
struct Cli {
    /// Log in as this user right away.
    #[arg(long, env = "PIXELBOARD_NAME")]
    name: Option<String>,

    /// `live` or `simulated`.
    #[arg(long)]
    transport: Option<String>,

    #[arg(long)]
    ws_url: Option<String>,

    #[arg(long)]
    login_url: Option<String>,

    #[arg(long)]
    pen_radius: Option<u32>,
}

impl Cli {
    fn apply(&self, mut config: ClientConfig) -> Result<ClientConfig, ConfigError> {
        if let Some(raw) = &self.transport {
            config.transport = Transport::parse(raw)?;
        }
        if let Some(url) = &self.ws_url {
            config.ws_url.clone_from(url);
        }
        if let Some(url) = &self.login_url {
            config.login_url.clone_from(url);
        }
        if let Some(radius) = self.pen_radius {
            config.pen_radius = radius;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "pixelboard failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = cli.apply(ClientConfig::from_env()?)?;
    info!(transport = ?config.transport, ws_url = %config.ws_url, "pixelboard starting");

    let login = login::service(&config)?;
    let connector = connection::connector(&config);
    let mut session = Session::new(&config, login, connector, TraceSurface::default());

    let events = session.events();
    let stdin = tokio::spawn(read_commands(events.clone()));
    let signals = tokio::spawn(teardown_on_ctrl_c(events.clone()));
    if let Some(name) = cli.name {
        events.post(SessionEvent::Ui(UiEvent::SubmitName(name)));
    }

    session.run().await;
    stdin.abort();
    signals.abort();
    info!("pixelboard stopped");
    Ok(())
}

async fn read_commands(events: EventSender) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => {}
            Ok(Some(line)) => match parse_command(&line) {
                Ok(event) => {
                    if !events.post(SessionEvent::Ui(event)) {
                        return;
                    }
                }
                Err(e) => warn!(error = %e, "ignoring input"),
            },
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "stdin failed");
                break;
            }
        }
    }
    events.post(SessionEvent::Ui(UiEvent::Teardown));
}

async fn teardown_on_ctrl_c(events: EventSender) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c");
        return;
    }
    info!("ctrl-c received");
    events.post(SessionEvent::Ui(UiEvent::Teardown));
}
