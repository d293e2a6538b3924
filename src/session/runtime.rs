//! Event loop that executes session effects
//!
//! The decoder and the presentation layer are collaborators behind traits.
//! Decoder callbacks reach the session through the channel returned by
//! [`Runtime::event_sender`]; each event is handled to completion before the
//! next one is taken off the channel.

use super::event::{Effect, Event};
use super::timer::TimerQueue;
use super::ScanSession;
use crate::config::ScanOptions;
use crate::error::DeviceError;
use crate::models::CameraSelector;
use log::{debug, trace};
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Instant;

/// Camera capture plus QR symbol decoding
///
/// Implementations deliver [`Event::Decoded`] and [`Event::DecodeFailed`]
/// through the runtime's event channel while running.
pub trait Decoder {
    /// Open `camera` and begin decoding
    fn start(&mut self, camera: &CameraSelector, options: &ScanOptions) -> Result<(), DeviceError>;
    /// Stop delivering decode callbacks until resumed
    fn pause(&mut self, emit_last_frame: bool);
    /// Resume after a pause
    fn resume(&mut self);
    /// Stop decoding and release the camera
    fn stop(&mut self);
}

/// Where status, results and feedback are rendered
pub trait PresentationSink {
    /// Replace the status line
    fn set_status(&mut self, text: &str);
    /// Render the round result
    fn show_result(&mut self, matched: bool);
    /// Remove the round result
    fn clear_result(&mut self);
    /// Show the full-screen flash
    fn flash(&mut self, matched: bool);
    /// Hide the flash
    fn hide_flash(&mut self);
    /// Play a vibration pattern; ignored where unsupported
    fn vibrate(&mut self, _pattern: &[u64]) {}
    /// Play the confirmation sound; ignored where unsupported
    fn beep(&mut self) {}
}

/// Text for a result banner
pub fn result_text(matched: bool) -> &'static str {
    if matched { "✅ MATCH" } else { "❌ NO MATCH" }
}

/// Text for the result flash
pub fn flash_text(matched: bool) -> &'static str {
    if matched { "MATCH ✅" } else { "NO MATCH ❌" }
}

/// A session wired to a decoder, a presentation sink, a channel and timers
pub struct Runtime<D, P> {
    session: ScanSession,
    decoder: D,
    sink: P,
    timers: TimerQueue,
    sender: Option<Sender<Event>>,
    receiver: Receiver<Event>,
}

impl<D: Decoder, P: PresentationSink> Runtime<D, P> {
    /// Wire a session to its collaborators
    pub fn new(session: ScanSession, decoder: D, sink: P) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            session,
            decoder,
            sink,
            timers: TimerQueue::new(),
            sender: Some(sender),
            receiver,
        }
    }

    /// Channel end for decoder callbacks and operator input
    ///
    /// Returns `None` once [`Runtime::run`] has started; from then on the
    /// loop ends when every handed-out sender is dropped.
    pub fn event_sender(&self) -> Option<Sender<Event>> {
        self.sender.clone()
    }

    /// The session
    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    /// The decoder
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// The presentation sink
    pub fn sink(&self) -> &P {
        &self.sink
    }

    /// Armed timers
    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Handle `event` and every event its effects produce
    pub fn dispatch(&mut self, event: Event, now: Instant) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            trace!("event {event:?}");
            for effect in self.session.handle(event) {
                if let Some(follow_up) = self.apply(effect, now) {
                    queue.push_back(follow_up);
                }
            }
        }
    }

    /// Deliver every timer due at `now`; returns how many fired
    pub fn fire_due(&mut self, now: Instant) -> usize {
        let due = self.timers.pop_due(now);
        let fired = due.len();
        for timer in due {
            self.dispatch(Event::TimerFired(timer), now);
        }
        fired
    }

    /// Handle every event already waiting on the channel; returns how many
    pub fn drain(&mut self, now: Instant) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.receiver.try_recv() {
            self.dispatch(event, now);
            handled += 1;
        }
        handled
    }

    /// Block on the channel and timers until all senders are gone and no
    /// timer is armed
    pub fn run(&mut self) {
        self.sender = None;
        let mut connected = true;
        loop {
            self.fire_due(Instant::now());
            let deadline = self.timers.next_deadline();

            if !connected {
                match deadline {
                    Some(at) => {
                        std::thread::sleep(at.saturating_duration_since(Instant::now()));
                        continue;
                    }
                    None => break,
                }
            }

            let received = match deadline {
                Some(at) => self
                    .receiver
                    .recv_timeout(at.saturating_duration_since(Instant::now())),
                None => self
                    .receiver
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(event) => self.dispatch(event, Instant::now()),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("event channel closed");
                    connected = false;
                }
            }
        }
    }

    fn apply(&mut self, effect: Effect, now: Instant) -> Option<Event> {
        match effect {
            Effect::SetStatus(text) => self.sink.set_status(&text),
            Effect::ShowResult { matched } => self.sink.show_result(matched),
            Effect::ClearResult => self.sink.clear_result(),
            Effect::Flash { matched } => self.sink.flash(matched),
            Effect::HideFlash => self.sink.hide_flash(),
            Effect::Vibrate(pattern) => self.sink.vibrate(pattern),
            Effect::Beep => self.sink.beep(),
            Effect::StartDecoder { camera, options } => {
                return Some(match self.decoder.start(&camera, &options) {
                    Ok(()) => Event::Started,
                    Err(err) => Event::StartFailed(err),
                });
            }
            Effect::PauseDecoder { emit_last_frame } => self.decoder.pause(emit_last_frame),
            Effect::ResumeDecoder => self.decoder.resume(),
            Effect::StopDecoder => self.decoder.stop(),
            Effect::Schedule { timer, after } => self.timers.schedule(timer, now, after),
            Effect::Cancel(timer) => {
                self.timers.cancel(timer);
            }
        }
        None
    }
}
