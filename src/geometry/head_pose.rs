//! 头部姿态有效性（正脸判断）
//!
//! 比较鼻尖与两眼外眼角中点的水平偏移：
//! ratio = |noseX - (leftEyeX + rightEyeX) / 2| / |leftEyeX - rightEyeX|
//! ratio 低于阈值视为正脸。只使用 x 坐标，归一化坐标即可。

use crate::error::LivenessResult;
use crate::landmarks::{FrameInput, LandmarkLayout, LandmarkPoint};

/// 两眼水平距离低于此值视为退化（归一化坐标）
const MIN_EYE_SPAN: f64 = 1e-9;

/// 鼻尖偏移比例；眼距为零时返回 `None`
pub fn frontal_ratio(nose_x: f64, left_eye_x: f64, right_eye_x: f64) -> Option<f64> {
    let eye_span = (left_eye_x - right_eye_x).abs();
    if !(eye_span > MIN_EYE_SPAN) {
        return None;
    }
    let mid = (left_eye_x + right_eye_x) / 2.0;
    Some((nose_x - mid).abs() / eye_span)
}

pub fn is_frontal(ratio: Option<f64>, max_ratio: f64) -> bool {
    ratio.map(|r| r < max_ratio).unwrap_or(false)
}

pub fn measure(frame: &FrameInput, layout: &LandmarkLayout) -> LivenessResult<Option<f64>> {
    let nose = layout.point(frame, LandmarkPoint::NoseTip)?;
    let left = layout.point(frame, LandmarkPoint::LeftEyeOuter)?;
    let right = layout.point(frame, LandmarkPoint::RightEyeOuter)?;
    Ok(frontal_ratio(nose.x, left.x, right.x))
}
