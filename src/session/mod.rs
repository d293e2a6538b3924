//! Scan session orchestration
//!
//! [`ScanSession`] is a synchronous reducer: each [`Event`] from the decoder,
//! a timer or the operator is turned into a list of [`Effect`]s for the host
//! to execute. The session owns the [`MatchEngine`], the processing guard,
//! the selected camera and the set of armed timers.
//!
//! Timers are keyed by round. Starting a new round cancels every armed timer
//! and bumps the round counter, so a timer that still fires afterwards is
//! recognized as stale and ignored.

/// Session events and effects
pub mod event;
/// Blocking runtime and host traits
pub mod runtime;
/// Deadline queue for session timers
pub mod timer;

pub use event::{Effect, Event, TimerId, TimerKind};
pub use runtime::{Decoder, PresentationSink, Runtime};
pub use timer::TimerQueue;

use crate::config::{MATCH_VIBRATION, NO_MATCH_VIBRATION, SessionConfig};
use crate::engine::MatchEngine;
use crate::error::DeviceError;
use crate::models::{CameraSelector, NormalizationMode, Outcome};
use log::{debug, warn};
use std::time::Duration;

/// Status shown after the first capture
pub const FIRST_CAPTURED_STATUS: &str = "First captured. Now scan the second.";
/// Status shown when the decoder cannot start
pub const CAMERA_ERROR_STATUS: &str = "Camera error. Check HTTPS and permissions.";

/// Lifecycle of the decoder as seen by the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing started yet
    Idle,
    /// Start requested, waiting for the decoder
    Starting,
    /// Decoder running (or stopped while a result is displayed)
    Active,
    /// The decoder failed to start; only an explicit retry leaves this phase
    Failed(DeviceError),
}

/// One scanning session: round state, guard, camera and timers
#[derive(Debug)]
pub struct ScanSession {
    engine: MatchEngine,
    config: SessionConfig,
    phase: SessionPhase,
    processing: bool,
    round: u64,
    camera: CameraSelector,
    pending: Vec<TimerId>,
}

impl ScanSession {
    /// Create an idle session
    pub fn new(mode: NormalizationMode, config: SessionConfig) -> Self {
        Self {
            engine: MatchEngine::new(mode),
            config,
            phase: SessionPhase::Idle,
            processing: false,
            round: 0,
            camera: CameraSelector::FacingEnvironment,
            pending: Vec::new(),
        }
    }

    /// The match engine
    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// Active normalization mode
    pub fn mode(&self) -> NormalizationMode {
        self.engine.mode()
    }

    /// Current phase
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    /// True while a capture is being evaluated or a result is displayed
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Round counter; increases on every reset
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Selected camera
    pub fn camera(&self) -> &CameraSelector {
        &self.camera
    }

    /// Timers armed by this session and not yet fired or cancelled
    pub fn pending_timers(&self) -> &[TimerId] {
        &self.pending
    }

    /// Session settings
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Status line prompting for the next scan
    pub fn prompt(&self) -> String {
        let which = if self.engine.state().is_empty() {
            "first"
        } else {
            "second"
        };
        format!("Scan {which} QR  •  Mode: {}", self.mode().label())
    }

    /// React to one event
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Boot { cameras } => match self.phase {
                SessionPhase::Idle => {
                    self.camera = CameraSelector::choose(&cameras);
                    debug!("booting with camera {:?}", self.camera);
                    self.start()
                }
                _ => Vec::new(),
            },
            Event::Started => {
                if self.phase != SessionPhase::Starting {
                    return Vec::new();
                }
                self.phase = SessionPhase::Active;
                vec![Effect::SetStatus(self.prompt())]
            }
            Event::StartFailed(err) => self.fail(err),
            Event::Retry => match self.phase {
                SessionPhase::Failed(_) => self.start(),
                _ => Vec::new(),
            },
            Event::Decoded(raw) => self.on_decode(&raw),
            Event::DecodeFailed => Vec::new(),
            Event::TimerFired(timer) => self.on_timer(timer),
            Event::ModeChanged(mode) => self.on_mode_changed(mode),
            Event::CameraSelected(camera) => {
                self.camera = camera;
                match self.phase {
                    SessionPhase::Idle => Vec::new(),
                    SessionPhase::Failed(_) => self.start(),
                    _ => self.new_round(true),
                }
            }
            Event::NextRound => match self.phase {
                SessionPhase::Idle => Vec::new(),
                SessionPhase::Failed(_) => self.start(),
                _ => self.new_round(true),
            },
        }
    }

    fn start(&mut self) -> Vec<Effect> {
        self.phase = SessionPhase::Starting;
        vec![Effect::StartDecoder {
            camera: self.camera.clone(),
            options: self.config.scan,
        }]
    }

    fn fail(&mut self, err: DeviceError) -> Vec<Effect> {
        warn!("decoder failed to start: {err}");
        let mut effects = self.cancel_pending();
        self.engine.reset();
        self.processing = false;
        effects.push(Effect::SetStatus(format!("{CAMERA_ERROR_STATUS} ({err})")));
        self.phase = SessionPhase::Failed(err);
        effects
    }

    fn on_decode(&mut self, raw: &str) -> Vec<Effect> {
        if self.phase != SessionPhase::Active || self.processing {
            debug!("dropping decode while busy or inactive");
            return Vec::new();
        }
        // guard first: the decoder may deliver another frame before the pause lands
        self.processing = true;
        let mut effects = vec![Effect::PauseDecoder {
            emit_last_frame: true,
        }];

        match self.engine.submit(raw) {
            Ok(Outcome::FirstCaptured { .. }) => {
                effects.push(Effect::SetStatus(FIRST_CAPTURED_STATUS.to_string()));
                effects.push(Effect::Beep);
                effects.push(self.schedule(TimerKind::Resume, self.config.debounce));
            }
            Ok(outcome) => {
                let matched = outcome.verdict() == Some(true);
                effects.push(Effect::StopDecoder);
                effects.push(Effect::ShowResult { matched });
                effects.push(Effect::Flash { matched });
                if self.config.vibrate {
                    effects.push(Effect::Vibrate(if matched {
                        MATCH_VIBRATION
                    } else {
                        NO_MATCH_VIBRATION
                    }));
                }
                effects.push(Effect::Beep);
                effects.push(Effect::SetStatus(
                    if matched {
                        "Same payload"
                    } else {
                        "Different payloads"
                    }
                    .to_string(),
                ));
                effects.push(self.schedule(TimerKind::HideFlash, self.config.flash));
                if let Some(delay) = self.config.auto_reset {
                    effects.push(self.schedule(TimerKind::AutoReset, delay));
                }
            }
            Err(err) => debug!("capture rejected: {err}"),
        }
        effects
    }

    fn on_timer(&mut self, timer: TimerId) -> Vec<Effect> {
        let Some(idx) = self.pending.iter().position(|id| *id == timer) else {
            debug!("ignoring stale timer {timer:?} in round {}", self.round);
            return Vec::new();
        };
        self.pending.swap_remove(idx);

        match timer.kind {
            TimerKind::Resume => {
                self.processing = false;
                vec![Effect::ResumeDecoder, Effect::SetStatus(self.prompt())]
            }
            TimerKind::HideFlash => vec![Effect::HideFlash],
            TimerKind::AutoReset => self.new_round(false),
        }
    }

    fn on_mode_changed(&mut self, mode: NormalizationMode) -> Vec<Effect> {
        if self.processing {
            debug!("ignoring mode change to {mode} while a capture is in flight");
            return Vec::new();
        }
        if let Err(err) = self.engine.set_mode(mode) {
            debug!("ignoring mode change to {mode}: {err}");
            return Vec::new();
        }
        match self.phase {
            SessionPhase::Active => vec![Effect::SetStatus(self.prompt())],
            _ => Vec::new(),
        }
    }

    /// Drop the round and restart the decoder; `stop` first when it may still be running
    fn new_round(&mut self, stop: bool) -> Vec<Effect> {
        let mut effects = self.cancel_pending();
        if stop {
            effects.push(Effect::StopDecoder);
        }
        self.engine.reset();
        self.round += 1;
        self.processing = false;
        debug!("round {} begins", self.round);
        effects.push(Effect::ClearResult);
        effects.push(Effect::HideFlash);
        effects.extend(self.start());
        effects
    }

    fn schedule(&mut self, kind: TimerKind, after: Duration) -> Effect {
        let timer = TimerId {
            round: self.round,
            kind,
        };
        self.pending.push(timer);
        Effect::Schedule { timer, after }
    }

    fn cancel_pending(&mut self) -> Vec<Effect> {
        self.pending.drain(..).map(Effect::Cancel).collect()
    }
}
