//! Line-fed decoding for scripted and piped sessions
//!
//! Each input line stands in for one decoded frame; lines starting with `:`
//! are operator commands. [`LineDecoder`] publishes the decoder state through
//! a shared [`LineGate`], and [`feed_lines`] holds every payload line until
//! the decoder is scanning again. A payload read during the pause between
//! the two captures is delivered after the pause, not lost.

use crate::config::ScanOptions;
use crate::error::DeviceError;
use crate::models::{CameraSelector, NormalizationMode, UnknownModeError};
use crate::session::{Decoder, Event};
use log::{debug, warn};
use std::io::BufRead;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// What the decoder is doing with incoming frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intake {
    /// Not started yet
    #[default]
    Starting,
    /// Scanning; the next payload is delivered
    Open,
    /// Paused, or a payload was just delivered and is being processed
    Paused,
    /// Stopped after a result or before a camera switch
    Stopped,
}

/// Decoder state shared between [`LineDecoder`] and the line reader
#[derive(Debug, Default)]
pub struct LineGate {
    intake: Mutex<Intake>,
    changed: Condvar,
}

impl LineGate {
    /// A gate for a decoder that has not started
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Intake> {
        self.intake.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state
    pub fn intake(&self) -> Intake {
        *self.lock()
    }

    /// Publish a new state and wake the reader
    pub fn set(&self, intake: Intake) {
        *self.lock() = intake;
        self.changed.notify_all();
    }

    /// Block until one payload may be delivered, and claim it
    ///
    /// Claiming moves the gate to [`Intake::Paused`], so exactly one payload
    /// goes out per open window. A stopped decoder is waited out only when
    /// `restart_expected` (auto reset on); otherwise this returns `false`
    /// and the payload should be dropped.
    pub fn claim(&self, restart_expected: bool) -> bool {
        let mut intake = self
            .changed
            .wait_while(self.lock(), |intake| match intake {
                Intake::Open => false,
                Intake::Stopped => restart_expected,
                Intake::Starting | Intake::Paused => true,
            })
            .unwrap_or_else(PoisonError::into_inner);
        if *intake == Intake::Open {
            *intake = Intake::Paused;
            true
        } else {
            false
        }
    }
}

/// [`Decoder`] for line input: the camera is the line reader
#[derive(Debug, Clone, Default)]
pub struct LineDecoder {
    gate: Arc<LineGate>,
}

impl LineDecoder {
    /// A decoder with a fresh gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate to hand to [`feed_lines`]
    pub fn gate(&self) -> Arc<LineGate> {
        Arc::clone(&self.gate)
    }
}

impl Decoder for LineDecoder {
    fn start(&mut self, camera: &CameraSelector, options: &ScanOptions) -> Result<(), DeviceError> {
        debug!(
            "line decoder started on {camera:?} ({} fps, {}px box)",
            options.fps, options.qrbox
        );
        self.gate.set(Intake::Open);
        Ok(())
    }

    fn pause(&mut self, _emit_last_frame: bool) {
        self.gate.set(Intake::Paused);
    }

    fn resume(&mut self) {
        self.gate.set(Intake::Open);
    }

    fn stop(&mut self) {
        self.gate.set(Intake::Stopped);
    }
}

/// A `:` line that is not a known command
#[derive(Debug, Error)]
pub enum CommandError {
    /// Unrecognized command word or missing argument
    #[error("unknown command `:{0}` (try :next, :retry, :mode <mode>, :camera <id>)")]
    Unknown(String),
    /// `:mode` with an unknown mode
    #[error(transparent)]
    Mode(#[from] UnknownModeError),
}

/// Parse the text after a leading `:`
pub fn parse_command(command: &str) -> Result<Event, CommandError> {
    let mut parts = command.trim().splitn(2, ' ');
    match (parts.next(), parts.next().map(str::trim)) {
        (Some("next"), None) => Ok(Event::NextRound),
        (Some("retry"), None) => Ok(Event::Retry),
        (Some("mode"), Some(mode)) => Ok(Event::ModeChanged(mode.parse::<NormalizationMode>()?)),
        (Some("camera"), Some(id)) if !id.is_empty() => Ok(Event::CameraSelected(
            CameraSelector::Device(id.to_string()),
        )),
        _ => Err(CommandError::Unknown(command.to_string())),
    }
}

/// Turn input lines into session events, in order; returns how many were sent
///
/// Payload lines wait on `gate` until the decoder is scanning. Blank lines
/// are failed decodes. A stopped decoder is waited out when
/// `restart_expected` or when a `:next`, `:retry` or `:camera` command went
/// out after the last payload. Reading stops at end of input or when the
/// session side of `events` is gone.
pub fn feed_lines<R: BufRead>(
    reader: R,
    events: &Sender<Event>,
    gate: &LineGate,
    restart_expected: bool,
) -> usize {
    let mut sent = 0;
    let mut restart_requested = false;
    for line in reader.lines() {
        let Ok(line) = line else {
            break;
        };
        let event = match line.strip_prefix(':') {
            Some(command) => match parse_command(command) {
                Ok(event) => {
                    restart_requested |= matches!(
                        event,
                        Event::NextRound | Event::Retry | Event::CameraSelected(_)
                    );
                    event
                }
                Err(err) => {
                    warn!("{err}");
                    continue;
                }
            },
            None if line.trim().is_empty() => Event::DecodeFailed,
            None => {
                if !gate.claim(restart_expected || restart_requested) {
                    warn!("decoder stopped, dropped {line:?} (send :next for a new round)");
                    continue;
                }
                restart_requested = false;
                Event::Decoded(line)
            }
        };
        if events.send(event).is_err() {
            break;
        }
        sent += 1;
    }
    sent
}
