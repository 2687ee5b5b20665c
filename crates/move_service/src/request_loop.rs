//! Request loop state machine
//!
//! Reads one line at a time, answers it with exactly one line and flushes
//! before reading the next. A bad request is reported on the output channel
//! and the loop keeps running; only channel I/O failures end it early.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{debug, info, warn};
use ttt_move_core::{Classifier, ClassifierError};
use ttt_move_trainer::{PredictError, TrainedModel};

use crate::protocol::{format_prediction, Command, PredictRequest, RequestParseError, READY_TOKEN};

pub const SHUTDOWN_ACK: &str = "Shutting down...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    ShuttingDown,
}

/// Per-request failures; reported, never fatal
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("bad request: {0}")]
    Parse(#[from] RequestParseError),

    #[error("prediction failed: {0}")]
    Predict(ClassifierError),
}

impl From<PredictError> for RequestError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Sanitize(e) => RequestError::Parse(RequestParseError::Malformed(e)),
            PredictError::Classifier(e) => RequestError::Predict(e),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub lines: u64,
    pub predictions: u64,
    pub acknowledgments: u64,
    pub errors: u64,
}

/// Serves predictions from a trained model over a line channel.
///
/// Holding `&TrainedModel` means the loop can only be built once training
/// has finished, and never mutates the model.
pub struct RequestLoop<'m, C, R, W> {
    model: &'m TrainedModel<C>,
    input: R,
    output: W,
    state: LoopState,
    stats: LoopStats,
}

impl<'m, C, R, W> RequestLoop<'m, C, R, W>
where
    C: Classifier,
    R: BufRead,
    W: Write,
{
    pub fn new(model: &'m TrainedModel<C>, input: R, output: W) -> Self {
        Self {
            model,
            input,
            output,
            state: LoopState::Running,
            stats: LoopStats::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Tell the client training is done and requests will be served
    pub fn announce_ready(&mut self) -> io::Result<()> {
        info!("Model ready, serving requests");
        self.respond(READY_TOKEN)
    }

    /// Read and answer lines until shutdown or end of input.
    pub fn run(&mut self) -> io::Result<LoopStats> {
        let mut buf = Vec::new();

        while self.state == LoopState::Running {
            buf.clear();
            if self.input.read_until(b'\n', &mut buf)? == 0 {
                info!("Input closed without shutdown command");
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            self.handle_line(&line)?;
        }

        Ok(self.stats)
    }

    /// Process exactly one input line. Once shut down, further lines are
    /// ignored and produce no output.
    pub fn handle_line(&mut self, line: &str) -> io::Result<LoopState> {
        if self.state == LoopState::ShuttingDown {
            return Ok(self.state);
        }

        self.stats.lines += 1;

        match Command::parse(line) {
            Ok(Command::Shutdown) => {
                info!("Shutdown requested");
                self.state = LoopState::ShuttingDown;
                self.respond(SHUTDOWN_ACK)?;
            }
            Ok(Command::Predict(request)) => match self.predict(&request) {
                Ok(label) => {
                    self.stats.predictions += 1;
                    debug!(label, attempt = ?request.attempt, "answered move request");
                    self.respond(&format_prediction(label))?;
                }
                Err(err) => self.report(err)?,
            },
            Ok(Command::Unknown(text)) => {
                self.stats.acknowledgments += 1;
                self.respond(&format!("Received: {text}"))?;
            }
            Err(err) => self.report(err.into())?,
        }

        Ok(self.state)
    }

    fn predict(&self, request: &PredictRequest) -> Result<i64, RequestError> {
        Ok(self.model.predict_row(request.tokens.as_slice())?)
    }

    fn report(&mut self, err: RequestError) -> io::Result<()> {
        self.stats.errors += 1;
        warn!("Rejected request: {}", err);
        self.respond(&format!("ERROR: {err}"))
    }

    fn respond(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")?;
        self.output.flush()
    }
}
