//! Liveness fusion: a fixed conjunctive rule over the current frame's
//! signals and the blink tracker state.
//!
//! All six checks must pass for a REAL verdict. There is no weighting and no
//! partial credit; the verdict is recomputed every frame and may flip from
//! one frame to the next.

use serde::{Deserialize, Serialize};

use crate::blink::{BlinkCounterState, BlinkHistory};
use crate::config::FusionConfig;
use crate::geometry::{FrameSignals, GazeDirection};

/// Outcome of each fusion condition, in rule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivenessChecks {
    pub face_present: bool,
    pub head_pose_valid: bool,
    /// A blink among the most recent history samples, or enough blinks
    /// over the session.
    pub blink_evidence: bool,
    pub distance_ok: bool,
    pub expression_ok: bool,
    pub gaze_centered: bool,
}

impl LivenessChecks {
    pub fn all_passed(&self) -> bool {
        self.face_present
            && self.head_pose_valid
            && self.blink_evidence
            && self.distance_ok
            && self.expression_ok
            && self.gaze_centered
    }
}

pub fn evaluate_checks(
    signals: &FrameSignals,
    history: &BlinkHistory,
    counter: &BlinkCounterState,
    config: &FusionConfig,
) -> LivenessChecks {
    LivenessChecks {
        face_present: signals.has_face(),
        head_pose_valid: signals.head_pose_valid,
        blink_evidence: history.any_recent(config.recent_blink_window)
            || counter.count >= config.min_blink_count,
        distance_ok: signals.face_distance.is_usable(),
        expression_ok: signals.expression_confidence > config.min_expression_confidence,
        gaze_centered: signals.eye_gaze_direction == GazeDirection::Center,
    }
}

/// The verdict alone: `true` means a live user.
pub fn is_live(
    signals: &FrameSignals,
    history: &BlinkHistory,
    counter: &BlinkCounterState,
    config: &FusionConfig,
) -> bool {
    evaluate_checks(signals, history, counter, config).all_passed()
}

/// Two-state view of the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    #[default]
    Spoof,
    Real,
}

impl Verdict {
    pub fn from_live(live: bool) -> Self {
        if live {
            Verdict::Real
        } else {
            Verdict::Spoof
        }
    }

    pub fn is_real(self) -> bool {
        self == Verdict::Real
    }
}

/// What the user should do next, taken from the first failing check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Guidance {
    PositionFace,
    FaceCamera,
    BlinkNaturally,
    MoveCloser,
    RelaxExpression,
    LookAtCamera,
    Verified,
}

impl Guidance {
    pub fn from_checks(checks: &LivenessChecks) -> Self {
        if !checks.face_present {
            Guidance::PositionFace
        } else if !checks.head_pose_valid {
            Guidance::FaceCamera
        } else if !checks.blink_evidence {
            Guidance::BlinkNaturally
        } else if !checks.distance_ok {
            // close is accepted, so a failing distance is always far or unknown
            Guidance::MoveCloser
        } else if !checks.expression_ok {
            Guidance::RelaxExpression
        } else if !checks.gaze_centered {
            Guidance::LookAtCamera
        } else {
            Guidance::Verified
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Guidance::PositionFace => "Position your face in the center of the camera",
            Guidance::FaceCamera => "Turn to face the camera",
            Guidance::BlinkNaturally => "Blink naturally a few times",
            Guidance::MoveCloser => "Move closer to the camera",
            Guidance::RelaxExpression => "Keep a relaxed, neutral expression",
            Guidance::LookAtCamera => "Look directly at the camera",
            Guidance::Verified => "Liveness validation successful",
        }
    }
}
