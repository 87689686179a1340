#![forbid(unsafe_code)]

//! `ehr-access-console` — requester and transparency console for the
//! EHR access decision service.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use ehr_access_console::config::ConsoleConfig;
use ehr_access_console::models::request::{ClinicalRole, TimeOfDay};
use ehr_access_console::service::{HttpPolicyService, PolicyService};
use ehr_access_console::view::{Perspective, ViewController};
use ehr_access_console::{console, render, AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "ehr-access-console",
    about = "Console for the EHR access decision service",
    version,
    long_about = None
)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate a single access request and print the decision.
    Evaluate {
        /// Clinical role of the requester.
        #[arg(long, value_enum)]
        role: ClinicalRole,
        /// Location label, e.g. "Internal_IP (Hospital)".
        #[arg(long)]
        location: String,
        /// Time of day.
        #[arg(long, value_enum, default_value_t = TimeOfDay::Daytime)]
        time: TimeOfDay,
        /// Requested resource or purpose.
        #[arg(long)]
        purpose: String,
        /// Request break-glass access.
        #[arg(long)]
        emergency: bool,
        /// Justification, required with `--emergency`.
        #[arg(long, required_if_eq("emergency", "true"))]
        justification: Option<String>,
    },

    /// Print the record's access history.
    Audit,

    /// Start the interactive console (default).
    Console {
        /// Perspective to open in.
        #[arg(long, value_enum, default_value_t = Perspective::Requester)]
        perspective: Perspective,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = match &args.config {
        Some(path) => ConsoleConfig::load_from_path(path)?,
        None => ConsoleConfig::default(),
    };
    config.apply_env_overrides()?;
    info!("configuration loaded");

    let service: Arc<dyn PolicyService> = Arc::new(HttpPolicyService::new(&config.service)?);
    let mut controller = ViewController::new(service);

    match args.command.unwrap_or(Command::Console {
        perspective: Perspective::Requester,
    }) {
        Command::Evaluate {
            role,
            location,
            time,
            purpose,
            emergency,
            justification,
        } => {
            let builder = controller.builder_mut();
            builder
                .set_role(role)
                .set_time_of_day(time)
                .set_purpose(purpose)
                .set_emergency_override(emergency)
                .set_justification(justification.unwrap_or_default());
            builder.set_location(&location)?;

            let result = controller.submit().await?;
            println!("{}", render::outcome(Some(&result.outcome)));
        }
        Command::Audit => {
            controller.switch_to(Perspective::SubjectTransparency).await;
            println!("{}", render::audit_log(controller.audit_log()));
        }
        Command::Console { perspective } => {
            controller.switch_to(perspective).await;

            let ct = CancellationToken::new();
            let signal_ct = ct.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                signal_ct.cancel();
            });

            let stdin = BufReader::new(tokio::io::stdin());
            console::run(&mut controller, stdin, tokio::io::stdout(), ct).await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "ctrl-c signal handler failed");
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
