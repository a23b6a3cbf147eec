use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LivenessError, LivenessResult};

/// Per-frame geometry thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeometryConfig {
    /// Average EAR below this value counts as a blink.
    pub ear_threshold: f64,
    /// Nose offset / eye span below this value counts as frontal.
    pub head_pose_ratio: f64,
    /// Max distance of the iris ratio from 0.5 still counted as centre.
    pub gaze_center_tolerance: f64,
    /// Normalised cheek-to-cheek span at or above which the face is close.
    pub close_face_width: f64,
    /// Normalised cheek-to-cheek span below which the face is far.
    pub far_face_width: f64,
    /// Mouth width / face width above which the face is smiling.
    pub smile_width_ratio: f64,
    /// Scales mouth-corner asymmetry into the expression confidence penalty.
    pub expression_asymmetry_gain: f64,
    pub frame_width: f64,
    pub frame_height: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.25,
            head_pose_ratio: 0.3,
            gaze_center_tolerance: 0.15,
            close_face_width: 0.55,
            far_face_width: 0.25,
            smile_width_ratio: 0.45,
            expression_asymmetry_gain: 2.0,
            frame_width: 640.0,
            frame_height: 480.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlinkConfig {
    /// Minimum gap between two counted blinks (milliseconds).
    pub debounce_ms: f64,
    pub history_capacity: usize,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300.0,
            history_capacity: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FusionConfig {
    /// How many of the newest history samples count as "recent".
    pub recent_blink_window: usize,
    /// Session blink count that satisfies the blink check on its own.
    pub min_blink_count: u32,
    /// Expression confidence must be strictly above this value.
    pub min_expression_confidence: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            recent_blink_window: 5,
            min_blink_count: 2,
            min_expression_confidence: 0.7,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivenessConfig {
    #[serde(default)]
    pub geometry: GeometryConfig,
    #[serde(default)]
    pub blink: BlinkConfig,
    #[serde(default)]
    pub fusion: FusionConfig,
}

impl LivenessConfig {
    pub fn from_json(raw: &str) -> LivenessResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with `LIVENESS_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut config = defaults.clone();

        config.geometry.ear_threshold =
            env_or_parse("LIVENESS_EAR_THRESHOLD", defaults.geometry.ear_threshold);
        config.geometry.head_pose_ratio =
            env_or_parse("LIVENESS_HEAD_POSE_RATIO", defaults.geometry.head_pose_ratio);
        config.geometry.frame_width =
            env_or_parse("LIVENESS_FRAME_WIDTH", defaults.geometry.frame_width);
        config.geometry.frame_height =
            env_or_parse("LIVENESS_FRAME_HEIGHT", defaults.geometry.frame_height);
        config.blink.debounce_ms =
            env_or_parse("LIVENESS_BLINK_DEBOUNCE_MS", defaults.blink.debounce_ms);
        config.blink.history_capacity = env_or_parse(
            "LIVENESS_HISTORY_CAPACITY",
            defaults.blink.history_capacity,
        );
        config.fusion.min_blink_count =
            env_or_parse("LIVENESS_MIN_BLINK_COUNT", defaults.fusion.min_blink_count);
        config.fusion.min_expression_confidence = env_or_parse(
            "LIVENESS_MIN_EXPRESSION_CONFIDENCE",
            defaults.fusion.min_expression_confidence,
        );

        if let Err(e) = config.validate() {
            tracing::warn!(error = %e, "Liveness env overrides rejected, using defaults");
            return defaults;
        }
        config
    }

    pub fn validate(&self) -> LivenessResult<()> {
        let g = &self.geometry;
        if !in_unit_range(g.ear_threshold) {
            return Err(invalid("geometry.ear_threshold must be in (0,1]"));
        }
        if !in_unit_range(g.head_pose_ratio) {
            return Err(invalid("geometry.head_pose_ratio must be in (0,1]"));
        }
        if !(0.0..0.5).contains(&g.gaze_center_tolerance) {
            return Err(invalid("geometry.gaze_center_tolerance must be in [0,0.5)"));
        }
        if !(g.far_face_width > 0.0
            && g.far_face_width < g.close_face_width
            && g.close_face_width.is_finite())
        {
            return Err(invalid(
                "geometry.far_face_width must be > 0 and < geometry.close_face_width (finite)",
            ));
        }
        if !in_unit_range(g.smile_width_ratio) {
            return Err(invalid("geometry.smile_width_ratio must be in (0,1]"));
        }
        if !(g.expression_asymmetry_gain.is_finite() && g.expression_asymmetry_gain >= 0.0) {
            return Err(invalid("geometry.expression_asymmetry_gain must be >= 0"));
        }
        if !(is_positive(g.frame_width) && is_positive(g.frame_height)) {
            return Err(invalid(
                "geometry.frame_width/frame_height must be finite and > 0",
            ));
        }

        if !(self.blink.debounce_ms.is_finite() && self.blink.debounce_ms >= 0.0) {
            return Err(invalid("blink.debounce_ms must be finite and >= 0"));
        }
        if self.blink.history_capacity == 0 {
            return Err(invalid("blink.history_capacity must be >= 1"));
        }

        let f = &self.fusion;
        if f.recent_blink_window == 0 || f.recent_blink_window > self.blink.history_capacity {
            return Err(invalid(
                "fusion.recent_blink_window must be in [1, blink.history_capacity]",
            ));
        }
        if !(0.0..=1.0).contains(&f.min_expression_confidence) {
            return Err(invalid("fusion.min_expression_confidence must be in [0,1]"));
        }
        Ok(())
    }
}

/// `(0,1]`; rejects NaN.
fn in_unit_range(v: f64) -> bool {
    v > 0.0 && v <= 1.0
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn invalid(msg: &str) -> LivenessError {
    LivenessError::InvalidConfig(msg.to_string())
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
