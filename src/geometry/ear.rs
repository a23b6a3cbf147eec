//! EAR (Eye Aspect Ratio) 眼部纵横比计算
//!
//! 标准6点公式: EAR = (|p2-p6| + |p3-p5|) / (2 * |p1-p4|)
//! - p1, p4: 眼角点（水平方向）
//! - p2, p3: 上眼睑点
//! - p5, p6: 下眼睑点（p6 与 p2 配对，p5 与 p3 配对）
//!
//! 距离在像素空间计算：归一化坐标先乘以帧宽高，避免宽高比失真。

use crate::config::GeometryConfig;
use crate::error::LivenessResult;
use crate::landmarks::{FrameInput, LandmarkLayout, LandmarkPoint, Point};

/// 眼角距离低于此值视为退化几何（单位：像素）
const MIN_EYE_WIDTH_PX: f64 = 1e-6;

const LEFT_EYE: [LandmarkPoint; 6] = [
    LandmarkPoint::LeftEyeOuter,
    LandmarkPoint::LeftEyeUpperOuter,
    LandmarkPoint::LeftEyeUpperInner,
    LandmarkPoint::LeftEyeInner,
    LandmarkPoint::LeftEyeLowerInner,
    LandmarkPoint::LeftEyeLowerOuter,
];

const RIGHT_EYE: [LandmarkPoint; 6] = [
    LandmarkPoint::RightEyeOuter,
    LandmarkPoint::RightEyeUpperOuter,
    LandmarkPoint::RightEyeUpperInner,
    LandmarkPoint::RightEyeInner,
    LandmarkPoint::RightEyeLowerInner,
    LandmarkPoint::RightEyeLowerOuter,
];

/// 单眼 EAR。眼角重合（退化几何）时返回 `None`。
pub fn eye_aspect_ratio(eye: &[Point; 6]) -> Option<f64> {
    let [p1, p2, p3, p4, p5, p6] = eye;
    let horizontal = p1.distance(p4);
    if !(horizontal > MIN_EYE_WIDTH_PX) {
        return None;
    }
    let vertical1 = p2.distance(p6);
    let vertical2 = p3.distance(p5);
    Some((vertical1 + vertical2) / (2.0 * horizontal))
}

/// 双眼 EAR 结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarReading {
    pub left: Option<f64>,
    pub right: Option<f64>,
}

impl EarReading {
    /// 左右眼取平均；任一眼退化则整体无效
    pub fn average(&self) -> Option<f64> {
        match (self.left, self.right) {
            (Some(l), Some(r)) => Some((l + r) / 2.0),
            _ => None,
        }
    }

    /// 平均 EAR 低于阈值视为眨眼。无效读数按"未眨眼"处理，避免检测伪影造成误判。
    pub fn is_blinking(&self, threshold: f64) -> bool {
        self.average().map(|ear| ear < threshold).unwrap_or(false)
    }
}

pub fn measure(
    frame: &FrameInput,
    layout: &LandmarkLayout,
    config: &GeometryConfig,
) -> LivenessResult<EarReading> {
    let left = eye_points(frame, layout, config, &LEFT_EYE)?;
    let right = eye_points(frame, layout, config, &RIGHT_EYE)?;
    Ok(EarReading {
        left: eye_aspect_ratio(&left),
        right: eye_aspect_ratio(&right),
    })
}

fn eye_points(
    frame: &FrameInput,
    layout: &LandmarkLayout,
    config: &GeometryConfig,
    names: &[LandmarkPoint; 6],
) -> LivenessResult<[Point; 6]> {
    let mut out = [Point::default(); 6];
    for (slot, &name) in out.iter_mut().zip(names.iter()) {
        *slot = layout
            .point(frame, name)?
            .scaled(config.frame_width, config.frame_height);
    }
    Ok(out)
}
