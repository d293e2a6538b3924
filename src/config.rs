//! Tunables, read from the environment with defaults
//!
//! Variables:
//! - `QRC_DEBOUNCE_MS` (default 350, clamped to 100..=2000)
//! - `QRC_AUTO_RESET_MS` (default 2500, `0` waits for an explicit next round)
//! - `QRC_FLASH_MS` (default 1200)
//! - `QRC_VIBRATE` (default 1)
//! - `QRC_FPS` (default 12, clamped to 1..=60)
//! - `QRC_VIEWPORT` (default 480)
//! - `QRC_CACHE_VERSION` (default `qr-compare-v1`)
//! - `QRC_PAIRS` (pair file for batch evaluation)

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default cache name; bump to invalidate every cached asset
pub const DEFAULT_CACHE_VERSION: &str = "qr-compare-v1";

/// Vibration pattern for a match, in milliseconds
pub const MATCH_VIBRATION: &[u64] = &[80];
/// Vibration pattern for a mismatch (on, off, on)
pub const NO_MATCH_VIBRATION: &[u64] = &[120, 60, 120];

fn parse_env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

/// Options handed to the decoder when it starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScanOptions {
    /// Frames per second the decoder samples
    pub fps: u32,
    /// Side of the square scan region, in CSS pixels
    pub qrbox: u32,
    /// Requested video aspect ratio
    pub aspect_ratio: f32,
}

impl ScanOptions {
    /// Options for a viewport `viewport_width` pixels wide
    pub fn for_viewport(fps: u32, viewport_width: u32) -> Self {
        Self {
            fps,
            qrbox: qrbox_side(viewport_width),
            aspect_ratio: 1.777,
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::for_viewport(12, 480)
    }
}

/// Square scan box: 70% of the viewport (capped at 480) and at most 300px
pub fn qrbox_side(viewport_width: u32) -> u32 {
    let width = viewport_width.min(480) as f32 * 0.7;
    (width.floor() as u32).min(300)
}

/// Timing and feedback settings for a scan session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionConfig {
    /// Delay before the decoder resumes after the first capture
    pub debounce: Duration,
    /// Delay before a resolved round resets itself; `None` waits for the user
    pub auto_reset: Option<Duration>,
    /// How long the match/no-match flash stays visible
    pub flash: Duration,
    /// Emit vibration patterns with results
    pub vibrate: bool,
    /// Decoder options
    pub scan: ScanOptions,
}

impl SessionConfig {
    /// Read every setting from the environment
    pub fn from_env() -> Self {
        let debounce = parse_env_u64("QRC_DEBOUNCE_MS", 350).clamp(100, 2000);
        let auto_reset = match parse_env_u64("QRC_AUTO_RESET_MS", 2500) {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        let fps = parse_env_u32("QRC_FPS", 12).clamp(1, 60);
        Self {
            debounce: Duration::from_millis(debounce),
            auto_reset,
            flash: Duration::from_millis(parse_env_u64("QRC_FLASH_MS", 1200)),
            vibrate: parse_env_bool_u8("QRC_VIBRATE", true),
            scan: ScanOptions::for_viewport(fps, parse_env_u32("QRC_VIEWPORT", 480)),
        }
    }

    /// Same settings, but resolved rounds wait for an explicit next round
    pub fn manual_advance(mut self) -> Self {
        self.auto_reset = None;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(350),
            auto_reset: Some(Duration::from_millis(2500)),
            flash: Duration::from_millis(1200),
            vibrate: true,
            scan: ScanOptions::default(),
        }
    }
}

/// Cache name from `QRC_CACHE_VERSION`
pub fn cache_version_from_env() -> String {
    std::env::var("QRC_CACHE_VERSION")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_CACHE_VERSION.to_string())
}

/// Pair file from `QRC_PAIRS`
pub fn pairs_file_from_env() -> Option<PathBuf> {
    std::env::var("QRC_PAIRS")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}
