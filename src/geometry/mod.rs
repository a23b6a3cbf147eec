//! Per-frame geometry metrics.
//!
//! Stateless: every function here maps one landmark set to signals and can
//! run concurrently for independent frames.

pub mod distance;
pub mod ear;
pub mod expression;
pub mod gaze;
pub mod head_pose;

use serde::{Deserialize, Serialize};

use crate::config::GeometryConfig;
use crate::error::LivenessResult;
use crate::landmarks::{FrameInput, LandmarkLayout};

pub use distance::FaceDistance;
pub use gaze::GazeDirection;

/// Signals derived from one frame's landmarks.
///
/// With `landmark_count == 0` every other field holds its no-signal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSignals {
    pub is_blinking: bool,
    pub head_pose_valid: bool,
    pub eye_gaze_direction: GazeDirection,
    pub face_distance: FaceDistance,
    pub is_smiling: bool,
    pub expression_confidence: f64,
    pub landmark_count: usize,
}

impl Default for FrameSignals {
    fn default() -> Self {
        Self::no_face()
    }
}

impl FrameSignals {
    pub fn no_face() -> Self {
        Self {
            is_blinking: false,
            head_pose_valid: false,
            eye_gaze_direction: GazeDirection::Unknown,
            face_distance: FaceDistance::Unknown,
            is_smiling: false,
            expression_confidence: 0.0,
            landmark_count: 0,
        }
    }

    pub fn has_face(&self) -> bool {
        self.landmark_count > 0
    }
}

/// Converts one frame's landmarks into [`FrameSignals`].
///
/// Never fails: an empty frame, or any landmark the layout cannot resolve
/// in this frame, yields [`FrameSignals::no_face`].
pub fn extract_signals(
    frame: &FrameInput,
    layout: &LandmarkLayout,
    config: &GeometryConfig,
) -> FrameSignals {
    if frame.is_empty() {
        return FrameSignals::no_face();
    }
    match try_extract(frame, layout, config) {
        Ok(signals) => signals,
        Err(e) => {
            tracing::debug!(
                layout = layout.name(),
                landmarks = frame.len(),
                error = %e,
                "Landmark access failed, treating frame as no face"
            );
            FrameSignals::no_face()
        }
    }
}

fn try_extract(
    frame: &FrameInput,
    layout: &LandmarkLayout,
    config: &GeometryConfig,
) -> LivenessResult<FrameSignals> {
    let ear = ear::measure(frame, layout, config)?;
    let pose_ratio = head_pose::measure(frame, layout)?;
    let iris_ratio = gaze::measure(frame, layout)?;
    let face_width = distance::measure(frame, layout)?;
    let expression = expression::measure(frame, layout, config)?;

    Ok(FrameSignals {
        is_blinking: ear.is_blinking(config.ear_threshold),
        head_pose_valid: head_pose::is_frontal(pose_ratio, config.head_pose_ratio),
        eye_gaze_direction: gaze::classify(iris_ratio, config.gaze_center_tolerance),
        face_distance: distance::classify(face_width, config),
        is_smiling: expression.is_smiling,
        expression_confidence: expression.confidence,
        landmark_count: frame.len(),
    })
}
