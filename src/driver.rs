//! Line-oriented driver for the onboarding flow.
//!
//! Each input line is parsed into a `Command` and applied to the session,
//! the intake form, or the confirmation step, whichever is active.

use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::config::OnboardingConfig;
use crate::confirmation::{Navigator, ResultConfirmation};
use crate::error::{Error, FlowError};
use crate::gateway::SubmissionGateway;
use crate::intake::{
    Division, EditOutcome, ExperienceTier, FormEdit, IgnoredReason, IntakeFormController,
    RankTier,
};
use crate::session::OnboardingSession;
use crate::stepper::{InMemoryPage, MilestoneSequence, ScrollOutcome};
use crate::store::Database;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Next,
    Back,
    Start,
    Edit(FormEdit),
    Submit,
    Confirm,
    Status,
    Help,
    Quit,
    /// Recognized command with an argument that did not parse.
    Invalid { command: String, reason: String },
    Unknown(String),
}

/// Parses user input into commands.
pub struct CommandParser;

impl CommandParser {
    pub fn parse(line: &str) -> Command {
        let trimmed = line.trim();
        let (head, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, Some(rest.trim())),
            None => (trimmed, None),
        };
        let arg = arg.filter(|a| !a.is_empty());

        match head.to_lowercase().as_str() {
            "next" | "n" | "down" => Command::Next,
            "back" | "b" | "up" => Command::Back,
            "start" => Command::Start,
            "submit" => Command::Submit,
            "confirm" | "ok" => Command::Confirm,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "age" => parse_field("age", arg, |a| {
                a.parse::<u32>()
                    .map_err(|_| format!("not a whole number: {a}"))
            })
            .map_or_else(|c| c, |v| Command::Edit(FormEdit::Age(v))),
            "rank" => parse_field("rank", arg, |a| a.parse::<RankTier>())
                .map_or_else(|c| c, |v| Command::Edit(FormEdit::Rank(v))),
            "division" | "div" => parse_field("division", arg, |a| a.parse::<Division>())
                .map_or_else(|c| c, |v| Command::Edit(FormEdit::Division(v))),
            "experience" | "exp" => parse_field("experience", arg, |a| a.parse::<ExperienceTier>())
                .map_or_else(|c| c, |v| Command::Edit(FormEdit::Experience(v))),
            _ => Command::Unknown(trimmed.to_string()),
        }
    }
}

/// Parse an optional field argument. A missing argument clears the field.
fn parse_field<T>(
    command: &str,
    arg: Option<&str>,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<Option<T>, Command> {
    match arg {
        None => Ok(None),
        Some(a) => parse(a).map(Some).map_err(|reason| Command::Invalid {
            command: command.to_string(),
            reason,
        }),
    }
}

const HELP: &str = "\
Commands:
  next | back            move through the milestones
  start                  open the intake form (after the last milestone)
  age N                  set age
  rank R                 set rank (Iron .. Radiant)
  division D             set division (1, 2, 3)
  experience E           set past experience (None, Tier 3, Tier 2, Tier 1)
  submit                 request a placement
  confirm                save the placement and continue
  status                 show where you are
  quit";

/// Navigator that prints the route it was sent to.
#[derive(Debug, Default)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: &str) {
        println!("Redirecting to {route}");
    }
}

/// Drives one onboarding run from typed commands.
pub struct Driver {
    session: OnboardingSession,
    intake: Option<IntakeFormController>,
    confirmation: Option<ResultConfirmation>,
    gateway: Arc<dyn SubmissionGateway>,
    db: Arc<dyn Database>,
    navigator: Arc<dyn Navigator>,
    redirect_route: String,
    finished: bool,
}

impl Driver {
    pub fn new(
        config: &OnboardingConfig,
        gateway: Arc<dyn SubmissionGateway>,
        db: Arc<dyn Database>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let mut session =
            OnboardingSession::new(MilestoneSequence::career_path(), config.throttle_window);
        session.attach(InMemoryPage::new());
        Self {
            session,
            intake: None,
            confirmation: None,
            gateway,
            db,
            navigator,
            redirect_route: config.redirect_route.clone(),
            finished: false,
        }
    }

    /// Whether the placement was confirmed and the flow has handed off.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn intake(&self) -> Option<&IntakeFormController> {
        self.intake.as_ref()
    }

    /// Apply one command and describe what happened.
    pub async fn handle(&mut self, command: Command) -> Result<String, Error> {
        match command {
            Command::Next => Ok(self.scroll(1.0)),
            Command::Back => Ok(self.scroll(-1.0)),
            Command::Start => {
                if self.intake.is_some() {
                    return Ok("Intake form is already open.".to_string());
                }
                let intake = self.session.open_intake(self.gateway.clone())?;
                self.intake = Some(intake);
                Ok("Intake form open. Set age, rank, division and experience, then submit.".into())
            }
            Command::Edit(edit) => {
                let intake = self.intake.as_ref().ok_or(FlowError::IntakeNotOpen)?;
                Ok(match intake.edit(edit) {
                    EditOutcome::Applied => describe_form(&intake.snapshot()),
                    EditOutcome::Ignored(reason) => describe_ignored(reason).to_string(),
                })
            }
            Command::Submit => {
                let intake = self.intake.as_ref().ok_or(FlowError::IntakeNotOpen)?;
                let placement = intake.submit().await?;
                let confirmation = ResultConfirmation::enter(
                    &intake.snapshot(),
                    self.db.clone(),
                    self.navigator.clone(),
                    self.redirect_route.clone(),
                )?;
                self.confirmation = Some(confirmation);
                Ok(format!(
                    "Starting tier: {}\nType 'confirm' to save and continue.",
                    placement.starting_tier
                ))
            }
            Command::Confirm => {
                let confirmation = self
                    .confirmation
                    .as_mut()
                    .ok_or(FlowError::NothingToConfirm)?;
                let record = confirmation.acknowledge().await?;
                self.finished = true;
                Ok(format!("Saved placement {} ({}).", record.id, record.starting_tier))
            }
            Command::Status => Ok(self.status()),
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok("Bye.".to_string()),
            Command::Invalid { command, reason } => Ok(format!("Invalid {command}: {reason}")),
            Command::Unknown(line) => Ok(format!("Unknown command: {line} (try 'help')")),
        }
    }

    fn scroll(&mut self, delta: f64) -> String {
        if self.intake.is_some() {
            return "The milestone screen is closed.".to_string();
        }
        let outcome = self.session.scroll(delta, Instant::now());
        let stepper = self.session.stepper();
        let milestone = stepper.active_milestone();
        let position = format!(
            "[{}/{}] {}: {}",
            stepper.active_index() + 1,
            stepper.milestones().len(),
            milestone.title,
            milestone.blurb
        );
        let note = match outcome {
            ScrollOutcome::Clamped { .. } => " (end of the road)",
            ScrollOutcome::Throttled => " (slow down)",
            _ => "",
        };
        let start = if self.session.start_enabled() {
            "\n'start' is now enabled."
        } else {
            ""
        };
        format!("{position}{note}{start}")
    }

    fn status(&self) -> String {
        let stepper = self.session.stepper();
        let mut out = format!(
            "Milestone {}/{} ({}), start {}",
            stepper.active_index() + 1,
            stepper.milestones().len(),
            stepper.active_milestone().title,
            if self.session.start_enabled() { "enabled" } else { "disabled" }
        );
        if let Some(intake) = &self.intake {
            out.push('\n');
            out.push_str(&describe_form(&intake.snapshot()));
        }
        if let Some(confirmation) = &self.confirmation {
            out.push_str(&format!("\nConfirmation: {}", confirmation.state()));
        }
        out
    }

    /// Read commands until `quit`, end of input, or a confirmed placement.
    pub async fn run<R>(&mut self, input: R) -> Result<(), Error>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        println!("{HELP}");
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Error reading input: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let command = CommandParser::parse(&line);
            let quit = command == Command::Quit;
            match self.handle(command).await {
                Ok(reply) => println!("{reply}"),
                Err(e) => println!("Error: {e}"),
            }
            if quit || self.finished {
                break;
            }
        }
        self.session.detach();
        Ok(())
    }
}

fn describe_form(state: &crate::intake::IntakeFormState) -> String {
    fn show<T: std::fmt::Display>(value: &Option<T>) -> String {
        value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string())
    }
    let mut out = format!(
        "age: {}, rank: {}, division: {}, experience: {}, status: {}",
        show(&state.age),
        show(&state.current_rank),
        if state.division_editable() { show(&state.division) } else { "n/a".to_string() },
        show(&state.past_experience),
        state.status
    );
    if let Some(error) = &state.last_error {
        out.push_str(&format!("\nLast error: {error}"));
    }
    out
}

fn describe_ignored(reason: IgnoredReason) -> &'static str {
    match reason {
        IgnoredReason::Locked => "Ignored: the form is locked while submitting or after success.",
        IgnoredReason::DivisionNotApplicable => "Ignored: the selected rank has no divisions.",
        IgnoredReason::ExperienceNotEligible => {
            "Ignored: past experience needs Ascendant or higher."
        }
    }
}
