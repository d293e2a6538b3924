use serde::{Deserialize, Serialize};

/// A video input reported by camera enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraSource {
    /// Opaque device identifier
    pub id: String,
    /// Human readable label, when the platform exposes one
    pub label: Option<String>,
}

impl CameraSource {
    /// Create a camera source
    pub fn new(id: impl Into<String>, label: Option<&str>) -> Self {
        Self {
            id: id.into(),
            label: label.map(str::to_string),
        }
    }

    /// Label for a camera picker; falls back to `Camera <n>` (1-based)
    pub fn display_label(&self, index: usize) -> String {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => format!("Camera {}", index + 1),
        }
    }

    fn looks_rear_facing(&self) -> bool {
        let Some(label) = self.label.as_deref() else {
            return false;
        };
        let label = label.to_lowercase();
        ["back", "rear", "environment"]
            .iter()
            .any(|needle| label.contains(needle))
    }
}

/// What the decoder should open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraSelector {
    /// A specific enumerated device
    Device(String),
    /// Any environment-facing camera
    FacingEnvironment,
}

impl CameraSelector {
    /// Pick a rear camera if one is labelled as such, else the first, else a facing hint
    pub fn choose(cameras: &[CameraSource]) -> Self {
        cameras
            .iter()
            .find(|camera| camera.looks_rear_facing())
            .or_else(|| cameras.first())
            .map(|camera| CameraSelector::Device(camera.id.clone()))
            .unwrap_or(CameraSelector::FacingEnvironment)
    }
}
