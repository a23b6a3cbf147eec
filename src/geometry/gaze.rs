//! Gaze bucket from the iris position between the eye corners.

use serde::{Deserialize, Serialize};

use crate::error::LivenessResult;
use crate::landmarks::{FrameInput, LandmarkLayout, LandmarkPoint, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GazeDirection {
    Left,
    Right,
    Center,
    #[default]
    Unknown,
}

/// Horizontal iris position inside one eye: 0.0 at the image-left corner,
/// 1.0 at the image-right corner.
pub fn iris_ratio(corner_a: &Point, corner_b: &Point, iris: &Point) -> Option<f64> {
    let left = corner_a.x.min(corner_b.x);
    let width = (corner_a.x - corner_b.x).abs();
    if !(width > 1e-9) {
        return None;
    }
    Some((iris.x - left) / width)
}

pub fn classify(ratio: Option<f64>, center_tolerance: f64) -> GazeDirection {
    match ratio {
        None => GazeDirection::Unknown,
        Some(r) if r < 0.5 - center_tolerance => GazeDirection::Left,
        Some(r) if r > 0.5 + center_tolerance => GazeDirection::Right,
        Some(_) => GazeDirection::Center,
    }
}

/// Mean iris ratio of both eyes, or `None` when the layout carries no iris
/// points or either eye is degenerate.
pub fn measure(frame: &FrameInput, layout: &LandmarkLayout) -> LivenessResult<Option<f64>> {
    if !(layout.has(LandmarkPoint::LeftIris) && layout.has(LandmarkPoint::RightIris)) {
        return Ok(None);
    }

    let left = iris_ratio(
        &layout.point(frame, LandmarkPoint::LeftEyeOuter)?,
        &layout.point(frame, LandmarkPoint::LeftEyeInner)?,
        &layout.point(frame, LandmarkPoint::LeftIris)?,
    );
    let right = iris_ratio(
        &layout.point(frame, LandmarkPoint::RightEyeInner)?,
        &layout.point(frame, LandmarkPoint::RightEyeOuter)?,
        &layout.point(frame, LandmarkPoint::RightIris)?,
    );

    Ok(match (left, right) {
        (Some(l), Some(r)) => Some((l + r) / 2.0),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iris_in_middle_is_center() {
        let ratio = iris_ratio(
            &Point::new(0.38, 0.45),
            &Point::new(0.46, 0.45),
            &Point::new(0.42, 0.45),
        );
        assert!((ratio.expect("valid eye") - 0.5).abs() < 1e-9);
        assert_eq!(classify(ratio, 0.15), GazeDirection::Center);
    }

    #[test]
    fn buckets() {
        assert_eq!(classify(Some(0.2), 0.15), GazeDirection::Left);
        assert_eq!(classify(Some(0.8), 0.15), GazeDirection::Right);
        assert_eq!(classify(Some(0.6), 0.15), GazeDirection::Center);
        assert_eq!(classify(None, 0.15), GazeDirection::Unknown);
    }

    #[test]
    fn collapsed_eye_has_no_ratio() {
        let p = Point::new(0.4, 0.45);
        assert_eq!(iris_ratio(&p, &p, &p), None);
    }

    #[test]
    fn layout_without_iris_is_unknown() {
        let frame = FrameInput::new(vec![Point::new(0.5, 0.5); 468]);
        let ratio = measure(&frame, &LandmarkLayout::mediapipe()).expect("no access failure");
        assert_eq!(ratio, None);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&GazeDirection::Center).expect("serialize");
        assert_eq!(json, "\"center\"");
    }
}
