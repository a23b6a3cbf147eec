use serde::{Deserialize, Serialize};

use crate::config::GeometryConfig;
use crate::error::LivenessResult;
use crate::landmarks::{FrameInput, LandmarkLayout, LandmarkPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceDistance {
    Close,
    Optimal,
    Far,
    #[default]
    Unknown,
}

impl FaceDistance {
    /// Close and optimal are both usable for liveness.
    pub fn is_usable(self) -> bool {
        matches!(self, FaceDistance::Close | FaceDistance::Optimal)
    }
}

/// Buckets the normalised cheek-to-cheek span. A larger span means the face
/// fills more of the frame, i.e. it is nearer the camera.
pub fn classify(face_width: Option<f64>, config: &GeometryConfig) -> FaceDistance {
    match face_width {
        None => FaceDistance::Unknown,
        Some(w) if w >= config.close_face_width => FaceDistance::Close,
        Some(w) if w < config.far_face_width => FaceDistance::Far,
        Some(_) => FaceDistance::Optimal,
    }
}

pub fn measure(frame: &FrameInput, layout: &LandmarkLayout) -> LivenessResult<Option<f64>> {
    let left = layout.point(frame, LandmarkPoint::LeftCheek)?;
    let right = layout.point(frame, LandmarkPoint::RightCheek)?;
    let width = (right.x - left.x).abs();
    Ok((width > 1e-9).then_some(width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_by_span() {
        let cfg = GeometryConfig::default();
        assert_eq!(classify(Some(0.7), &cfg), FaceDistance::Close);
        assert_eq!(classify(Some(0.55), &cfg), FaceDistance::Close);
        assert_eq!(classify(Some(0.4), &cfg), FaceDistance::Optimal);
        assert_eq!(classify(Some(0.25), &cfg), FaceDistance::Optimal);
        assert_eq!(classify(Some(0.1), &cfg), FaceDistance::Far);
        assert_eq!(classify(None, &cfg), FaceDistance::Unknown);
    }

    #[test]
    fn usable_buckets() {
        assert!(FaceDistance::Close.is_usable());
        assert!(FaceDistance::Optimal.is_usable());
        assert!(!FaceDistance::Far.is_usable());
        assert!(!FaceDistance::Unknown.is_usable());
    }
}
