//! Smile flag and expression confidence from mouth deformation.
//!
//! Confidence measures how consistently the mouth sits around the nose
//! axis: a relaxed live face keeps both mouth corners at a similar distance
//! from the nose tip, while a bent print or a partially occluded face
//! pulls them apart.

use crate::config::GeometryConfig;
use crate::error::LivenessResult;
use crate::landmarks::{FrameInput, LandmarkLayout, LandmarkPoint};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExpressionReading {
    pub is_smiling: bool,
    /// In `[0,1]`.
    pub confidence: f64,
}

/// `1 - gain * |dL - dR| / (dL + dR)`, clamped to `[0,1]`. Zero when both
/// distances vanish.
pub fn symmetry_confidence(left_dist: f64, right_dist: f64, gain: f64) -> f64 {
    let total = left_dist + right_dist;
    if !(total > 1e-9) {
        return 0.0;
    }
    let asymmetry = (left_dist - right_dist).abs() / total;
    (1.0 - gain * asymmetry).clamp(0.0, 1.0)
}

pub fn is_smile(mouth_width: f64, face_width: f64, min_ratio: f64) -> bool {
    face_width > 1e-9 && mouth_width / face_width > min_ratio
}

pub fn measure(
    frame: &FrameInput,
    layout: &LandmarkLayout,
    config: &GeometryConfig,
) -> LivenessResult<ExpressionReading> {
    let px = |name| {
        layout
            .point(frame, name)
            .map(|p| p.scaled(config.frame_width, config.frame_height))
    };
    let nose = px(LandmarkPoint::NoseTip)?;
    let mouth_left = px(LandmarkPoint::MouthLeft)?;
    let mouth_right = px(LandmarkPoint::MouthRight)?;
    let cheek_left = px(LandmarkPoint::LeftCheek)?;
    let cheek_right = px(LandmarkPoint::RightCheek)?;

    let confidence = symmetry_confidence(
        nose.distance(&mouth_left),
        nose.distance(&mouth_right),
        config.expression_asymmetry_gain,
    );
    let is_smiling = is_smile(
        mouth_left.distance(&mouth_right),
        cheek_left.distance(&cheek_right),
        config.smile_width_ratio,
    );

    Ok(ExpressionReading {
        is_smiling,
        confidence,
    })
}
