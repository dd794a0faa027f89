use std::io::{self, Write};

use redis::RedisError;
use thiserror::Error as ThisError;
use tracing::{debug, error, info, instrument, warn};

use crate::config::DEFAULT_MAX_STEPS;
use crate::connection::{is_fatal, Session, Transport};
use crate::reply::{Reply, ReplyError};
use crate::script::{Next, Script, ScriptError};

const BEGIN: &str = "--- BEGIN ---";
const END: &str = "--- END ---";

#[derive(Debug, ThisError)]
pub enum RunError {
    #[error("connection error; {0}")]
    Connection(#[source] RedisError),
    #[error("step {label} ({command}): {source}")]
    UnexpectedReply {
        label: &'static str,
        command: String,
        #[source]
        source: ReplyError,
    },
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("step limit of {0} reached")]
    StepLimit(usize),
    #[error("the session was already closed by a previous run")]
    SessionClosed,
    #[error("failed to write transcript; {0}")]
    Output(#[from] io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    AwaitingReply,
    Done,
    Aborted,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The server answered positively.
    Accepted(Reply),
    /// The server answered, but negatively: nil, zero or an empty string.
    Rejected(Reply),
    /// The server refused the command, e.g. an operation against a key of the wrong type.
    Failed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    fn text(&self) -> String {
        match self {
            Outcome::Accepted(reply) | Outcome::Rejected(reply) => reply.to_string(),
            Outcome::Failed(err) => err.clone(),
        }
    }
}

/// What happened to a single command.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceEntry {
    pub seq: usize,
    pub label: &'static str,
    pub command: &'static str,
    pub args: Vec<String>,
    pub outcome: Outcome,
    pub note: Option<&'static str>,
    pub message: String,
}

#[derive(Debug)]
pub enum RunEnd {
    /// Every step ran and the last one continued past the end of the script.
    Completed,
    /// A step's continuation ended the run.
    Stopped { label: &'static str },
    Aborted(RunError),
}

/// The trace of a run: entries in execution order, the lines printed and how the run ended.
#[derive(Debug)]
pub struct Report {
    pub script: &'static str,
    entries: Vec<TraceEntry>,
    lines: Vec<String>,
    end: RunEnd,
}

impl Report {
    fn new(script: &'static str) -> Report {
        Report {
            script,
            entries: Vec::new(),
            lines: Vec::new(),
            end: RunEnd::Completed,
        }
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn end(&self) -> &RunEnd {
        &self.end
    }

    /// Every line printed during the run, banners and notes included.
    pub fn transcript(&self) -> &[String] {
        &self.lines
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self.end, RunEnd::Aborted(_))
    }

    pub fn into_result(self) -> Result<Vec<TraceEntry>, RunError> {
        match self.end {
            RunEnd::Aborted(err) => Err(err),
            _ => Ok(self.entries),
        }
    }
}

/// Runs a script against a session one command at a time, choosing each next step from the reply to
/// the previous one.
pub struct Runner<T> {
    session: Option<Session<T>>,
    state: State,
    out: Box<dyn Write + Send>,
    max_steps: usize,
}

impl<T: Transport> Runner<T> {
    pub fn new(session: Session<T>) -> Runner<T> {
        Runner {
            session: Some(session),
            state: State::Idle,
            out: Box::new(io::stdout()),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Where the transcript is printed, stdout by default.
    pub fn with_output(mut self, out: impl Write + Send + 'static) -> Runner<T> {
        self.out = Box::new(out);
        self
    }

    pub fn with_step_limit(mut self, max_steps: usize) -> Runner<T> {
        self.max_steps = max_steps;
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Runs the script to its end. The session is closed once the run completes or stops, and
    /// dropped without ceremony when the run aborts. A runner drives a single run.
    #[instrument(name = "run", skip(self, script), fields(script = script.name, session_id))]
    pub async fn run(&mut self, script: &Script) -> Report {
        if let Some(session) = &self.session {
            tracing::Span::current().record("session_id", session.id.to_string());
        }

        let mut report = Report::new(script.name);

        match self.drive(script, &mut report).await {
            Ok(end) => {
                self.state = State::Done;
                info!(entries = report.entries.len(), ?end, "run finished");
                if let Some(session) = self.session.take() {
                    session.close().await;
                }
                report.end = end;
            }
            Err(err) => {
                self.state = State::Aborted;
                error!(entries = report.entries.len(), "run aborted: {}", err);
                self.session = None;
                report.end = RunEnd::Aborted(err);
            }
        }

        report
    }

    async fn drive(&mut self, script: &Script, report: &mut Report) -> Result<RunEnd, RunError> {
        script.validate()?;
        let session = self.session.as_mut().ok_or(RunError::SessionClosed)?;

        if script.banner {
            emit(&mut self.out, report, BEGIN)?;
        }

        let mut cursor = 0;
        loop {
            let Some(step) = script.steps.get(cursor) else {
                if script.banner {
                    emit(&mut self.out, report, END)?;
                }
                return Ok(RunEnd::Completed);
            };

            if report.entries.len() >= self.max_steps {
                return Err(RunError::StepLimit(self.max_steps));
            }

            if let Some(note) = step.note {
                emit(&mut self.out, report, note)?;
            }
            if let Some(delay) = step.delay {
                debug!(label = step.label, ?delay, "waiting before next step");
                tokio::time::sleep(delay).await;
            }

            self.state = State::AwaitingReply;
            let result = session.execute(&step.command).await;
            self.state = State::Idle;

            let outcome = match result {
                Ok(value) => match Reply::decode(value, step.command.shape()) {
                    Ok(reply) if reply.is_truthy() => Outcome::Accepted(reply),
                    Ok(reply) => Outcome::Rejected(reply),
                    Err(source) => {
                        return Err(RunError::UnexpectedReply {
                            label: step.label,
                            command: step.command.to_string(),
                            source,
                        })
                    }
                },
                Err(err) if is_fatal(&err) => return Err(RunError::Connection(err)),
                Err(err) => {
                    warn!(label = step.label, command = %step.command, "command failed: {}", err);
                    Outcome::Failed(error_text(&err))
                }
            };

            let args = step.command.formatted_args();
            let template = if outcome.is_success() {
                step.accepted
            } else {
                step.rejected
            };
            let message = template.render(&args, &outcome.text());

            for line in message.lines() {
                emit(&mut self.out, report, line)?;
            }

            let next = if outcome.is_success() {
                step.on_success
            } else {
                step.on_failure
            };

            report.entries.push(TraceEntry {
                seq: report.entries.len(),
                label: step.label,
                command: step.command.name(),
                args,
                outcome,
                note: step.note,
                message,
            });

            cursor = match next {
                Next::Continue => cursor + 1,
                Next::Goto(label) => script
                    .position(label)
                    .ok_or(ScriptError::UnknownLabel {
                        script: script.name,
                        step: step.label,
                        label,
                    })?,
                Next::Stop => return Ok(RunEnd::Stopped { label: step.label }),
            };
        }
    }
}

fn emit(out: &mut Box<dyn Write + Send>, report: &mut Report, line: &str) -> io::Result<()> {
    writeln!(out, "{}", line)?;
    report.lines.push(line.to_string());
    Ok(())
}

/// The error as the server worded it, e.g. `WRONGTYPE Operation against a key holding the wrong
/// kind of value`.
fn error_text(err: &RedisError) -> String {
    match (err.code(), err.detail()) {
        (Some(code), Some(detail)) => format!("{} {}", code, detail),
        _ => err.to_string(),
    }
}
