//! Interactive line-oriented console driving a [`ViewController`].
//!
//! ## Commands
//!
//! One command per line:
//! ```text
//! role doctor                     location Internal_IP (Hospital)
//! time night                      purpose Lab Results
//! emergency on|off                justify <text>
//! submit                          view requester|subject
//! refresh                         show
//! help                            quit
//! ```
//!
//! `submit` returns to the prompt at once. The decision panel is redrawn
//! whenever the displayed outcome changes, so a newer submission replaces
//! the shown outcome even while an older call is still out.

use clap::ValueEnum;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::decision::{DisplayState, SubmissionResult};
use crate::models::reference::{LOCATION_LABELS, ROLES};
use crate::models::request::{ClinicalRole, TimeOfDay};
use crate::render;
use crate::view::{Perspective, ViewController};
use crate::{AppError, Result};

/// Help text listing the available commands.
pub const HELP_TEXT: &str = "\
Commands:
  role <name>           select clinical role
  location <label>      select location label
  time day|night        select time of day
  purpose <text>        set resource or purpose
  emergency on|off      toggle break-glass access
  justify <text>        set break-glass justification
  submit                evaluate the current request
  view requester|subject
                        switch perspective
  refresh               reload the access history
  show                  redraw the active panel
  help                  show this help
  quit                  leave the console";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Select a role.
    Role(ClinicalRole),
    /// Select a location label.
    Location(String),
    /// Select the time window.
    Time(TimeOfDay),
    /// Set the purpose text.
    Purpose(String),
    /// Toggle break-glass access.
    Emergency(bool),
    /// Set the justification text.
    Justify(String),
    /// Submit the current form.
    Submit,
    /// Switch perspective.
    View(Perspective),
    /// Refresh the access history.
    Refresh,
    /// Redraw the active panel.
    Show,
    /// Print help.
    Help,
    /// Leave the console.
    Quit,
}

/// Parse one input line.
///
/// # Errors
///
/// Returns `AppError::Validation` for unknown verbs or bad arguments.
pub fn parse_command(line: &str) -> Result<ConsoleCommand> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    match verb.to_ascii_lowercase().as_str() {
        "role" => Ok(ConsoleCommand::Role(rest.parse()?)),
        "location" => {
            if rest.is_empty() {
                return Err(AppError::Validation(format!(
                    "location requires one of: {}",
                    LOCATION_LABELS.join(", ")
                )));
            }
            Ok(ConsoleCommand::Location(rest.to_owned()))
        }
        "time" => Ok(ConsoleCommand::Time(rest.parse()?)),
        "purpose" => Ok(ConsoleCommand::Purpose(rest.to_owned())),
        "emergency" => match rest.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" => Ok(ConsoleCommand::Emergency(true)),
            "off" | "no" | "false" => Ok(ConsoleCommand::Emergency(false)),
            other => Err(AppError::Validation(format!(
                "emergency expects on or off, got '{other}'"
            ))),
        },
        "justify" => Ok(ConsoleCommand::Justify(rest.to_owned())),
        "submit" => Ok(ConsoleCommand::Submit),
        "view" => Perspective::from_str(rest, true)
            .map(ConsoleCommand::View)
            .map_err(|_| AppError::Validation(format!("unknown perspective '{rest}'"))),
        "refresh" => Ok(ConsoleCommand::Refresh),
        "show" => Ok(ConsoleCommand::Show),
        "help" | "?" => Ok(ConsoleCommand::Help),
        "quit" | "exit" => Ok(ConsoleCommand::Quit),
        other => Err(AppError::Validation(format!("unknown command '{other}'"))),
    }
}

/// Render the panel for the active perspective.
#[must_use]
pub fn active_panel(controller: &ViewController) -> String {
    match controller.perspective() {
        Perspective::Requester => format!(
            "== Requester ==\n{}\n{}",
            render::form(controller.builder()),
            render::outcome(controller.decisions().outcome().as_ref())
        ),
        Perspective::SubjectTransparency => format!(
            "== Transparency dashboard ==\n{}",
            render::audit_log(controller.audit_log())
        ),
    }
}

async fn write_block<W>(output: &mut W, text: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

/// Per-run console state.
struct Session<W> {
    output: W,
    decisions: watch::Receiver<DisplayState>,
    in_flight: Option<JoinHandle<SubmissionResult>>,
}

impl<W> Session<W>
where
    W: AsyncWrite + Unpin,
{
    fn new(controller: &ViewController, output: W) -> Self {
        Self {
            output,
            decisions: controller.decisions().subscribe(),
            in_flight: None,
        }
    }

    /// Draw the displayed outcome when the requester panel is active.
    async fn show_decision(&mut self, controller: &ViewController) -> Result<()> {
        let outcome = self.decisions.borrow_and_update().outcome.clone();
        if controller.perspective() == Perspective::Requester {
            write_block(&mut self.output, &render::outcome(outcome.as_ref())).await?;
        }
        Ok(())
    }

    /// Apply a command. Returns `false` when the console should stop.
    async fn execute(
        &mut self,
        controller: &mut ViewController,
        command: ConsoleCommand,
    ) -> Result<bool> {
        match command {
            ConsoleCommand::Role(role) => {
                controller.builder_mut().set_role(role);
            }
            ConsoleCommand::Location(label) => {
                controller.builder_mut().set_location(&label)?;
            }
            ConsoleCommand::Time(time) => {
                controller.builder_mut().set_time_of_day(time);
            }
            ConsoleCommand::Purpose(purpose) => {
                controller.builder_mut().set_purpose(purpose);
            }
            ConsoleCommand::Emergency(enabled) => {
                controller.builder_mut().set_emergency_override(enabled);
            }
            ConsoleCommand::Justify(text) => {
                controller.builder_mut().set_justification(text);
            }
            ConsoleCommand::Submit => {
                // Older calls keep running; the client discards their answers.
                self.in_flight = Some(controller.dispatch_submit()?);
                self.show_decision(controller).await?;
                return Ok(true);
            }
            ConsoleCommand::View(target) => {
                controller.switch_to(target).await;
                write_block(&mut self.output, &active_panel(controller)).await?;
                return Ok(true);
            }
            ConsoleCommand::Refresh => {
                controller.refresh_audit_log().await;
                write_block(&mut self.output, &render::audit_log(controller.audit_log())).await?;
                return Ok(true);
            }
            ConsoleCommand::Show => {
                write_block(&mut self.output, &active_panel(controller)).await?;
                return Ok(true);
            }
            ConsoleCommand::Help => {
                let roles: Vec<String> = ROLES.iter().map(ToString::to_string).collect();
                write_block(
                    &mut self.output,
                    &format!(
                        "{HELP_TEXT}\nRoles: {}\nLocations: {}",
                        roles.join(", "),
                        LOCATION_LABELS.join(", ")
                    ),
                )
                .await?;
                return Ok(true);
            }
            ConsoleCommand::Quit => return Ok(false),
        }

        write_block(&mut self.output, "OK").await?;
        Ok(true)
    }

    /// Wait for the latest submission to settle, then draw its outcome.
    async fn drain(&mut self, controller: &ViewController, ct: &CancellationToken) -> Result<()> {
        if let Some(handle) = self.in_flight.take() {
            tokio::select! {
                () = ct.cancelled() => return Ok(()),
                joined = handle => {
                    if let Err(err) = joined {
                        warn!(%err, "submission task ended abnormally");
                    }
                }
            }
        }
        if self.decisions.has_changed().unwrap_or(false) {
            self.show_decision(controller).await?;
        }
        Ok(())
    }
}

/// Run the console until `quit`, end of input, or cancellation.
///
/// Command errors are printed and the loop continues; only I/O
/// failures on the console streams end it with an error. On `quit` or
/// end of input the latest submission is awaited and its outcome shown.
///
/// # Errors
///
/// Returns `AppError::Io` if reading input or writing output fails.
pub async fn run<R, W>(
    controller: &mut ViewController,
    input: R,
    output: W,
    ct: CancellationToken,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut session = Session::new(controller, output);
    write_block(&mut session.output, &active_panel(controller)).await?;

    loop {
        let line = tokio::select! {
            () = ct.cancelled() => {
                info!("console cancelled");
                return Ok(());
            }
            Ok(()) = session.decisions.changed() => {
                session.show_decision(controller).await?;
                continue;
            }
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            debug!("console input closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let outcome = match parse_command(&line) {
            Ok(command) => session.execute(controller, command).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(true) => {}
            Ok(false) => break,
            Err(AppError::Io(msg)) => return Err(AppError::Io(msg)),
            Err(err) => write_block(&mut session.output, &format!("Error: {err}")).await?,
        }
    }

    session.drain(controller, &ct).await
}
