/// Camera sources and selection
pub mod camera;
/// Normalization modes
pub mod mode;
/// Canonical values, round outcomes and round state
pub mod outcome;

pub use camera::{CameraSelector, CameraSource};
pub use mode::{NormalizationMode, UnknownModeError};
pub use outcome::{CanonicalValue, Outcome, RoundState};
