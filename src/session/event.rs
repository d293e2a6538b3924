use crate::config::ScanOptions;
use crate::error::DeviceError;
use crate::models::{CameraSelector, CameraSource, NormalizationMode};
use std::time::Duration;

/// Something that happened outside the session
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Cameras were enumerated; pick one and start decoding
    Boot {
        /// Available video inputs, possibly empty
        cameras: Vec<CameraSource>,
    },
    /// The decoder is running
    Started,
    /// The decoder could not start
    StartFailed(DeviceError),
    /// The operator asked to try starting again after a failure
    Retry,
    /// The decoder recognized a symbol
    Decoded(String),
    /// A frame contained no readable symbol
    DecodeFailed,
    /// A scheduled timer elapsed
    TimerFired(TimerId),
    /// The operator picked another normalization mode
    ModeChanged(NormalizationMode),
    /// The operator picked another camera
    CameraSelected(CameraSelector),
    /// The operator asked for a fresh round
    NextRound,
}

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    /// Re-enable the decoder after the first capture
    Resume,
    /// Hide the result flash
    HideFlash,
    /// Start a new round after a result
    AutoReset,
}

/// A timer belongs to the round that scheduled it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId {
    /// Round counter at scheduling time
    pub round: u64,
    /// Action on expiry
    pub kind: TimerKind,
}

/// A command the session asks its host to carry out
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Replace the status line
    SetStatus(String),
    /// Render the round result
    ShowResult {
        /// Whether the two payloads matched
        matched: bool,
    },
    /// Remove the rendered result
    ClearResult,
    /// Full-screen flash for the result
    Flash {
        /// Whether the two payloads matched
        matched: bool,
    },
    /// Remove the flash
    HideFlash,
    /// Haptic pattern in milliseconds (on, off, on, ...)
    Vibrate(&'static [u64]),
    /// Audible confirmation
    Beep,
    /// Start decoding from a camera
    StartDecoder {
        /// Camera to open
        camera: CameraSelector,
        /// Decoder settings
        options: ScanOptions,
    },
    /// Stop emitting decode callbacks for now
    PauseDecoder {
        /// Keep the last frame on screen while paused
        emit_last_frame: bool,
    },
    /// Resume a paused decoder
    ResumeDecoder,
    /// Stop the decoder and release the camera
    StopDecoder,
    /// Arm a timer
    Schedule {
        /// Timer identity
        timer: TimerId,
        /// Delay from now
        after: Duration,
    },
    /// Disarm a timer
    Cancel(TimerId),
}
