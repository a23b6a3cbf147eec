//! Landmark input model and the named-point lookup table.
//!
//! Geometry code never indexes the raw landmark vector directly. It asks a
//! [`LandmarkLayout`] for a semantic [`LandmarkPoint`], so a different
//! detector only needs a different table.
//!
//! Left/right follow the image sides of an unmirrored frame, which is also
//! how MediaPipe FaceMesh names its points.

use serde::{Deserialize, Serialize};

use crate::error::{LivenessError, LivenessResult};

/// A single detected keypoint. `x`/`y` are normalised to `[0,1]` of the
/// frame size; `z` is the detector's relative depth when present.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_depth(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Euclidean distance in the 2D image plane.
    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Same point with coordinates multiplied into pixel space.
    pub fn scaled(&self, width: f64, height: f64) -> Point {
        Point {
            x: self.x * width,
            y: self.y * height,
            z: self.z,
        }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Landmarks for one processed frame. Empty when no face was detected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    pub landmarks: Vec<Point>,
}

impl FrameInput {
    pub fn new(landmarks: Vec<Point>) -> Self {
        Self { landmarks }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Builds a frame from an interleaved coordinate buffer
    /// (`x0,y0[,z0],x1,y1[,z1],...`) with a stride of 2 or 3.
    pub fn from_flat(coords: &[f64], stride: usize) -> LivenessResult<Self> {
        if !(stride == 2 || stride == 3) || coords.len() % stride != 0 {
            return Err(LivenessError::MalformedLandmarks {
                len: coords.len(),
                stride,
            });
        }
        let landmarks = coords
            .chunks_exact(stride)
            .map(|c| match stride {
                3 => Point::with_depth(c[0], c[1], c[2]),
                _ => Point::new(c[0], c[1]),
            })
            .collect();
        Ok(Self { landmarks })
    }
}

const POINT_COUNT: usize = 19;

/// Semantic facial points used by the geometry metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkPoint {
    NoseTip,
    LeftEyeOuter,
    LeftEyeUpperOuter,
    LeftEyeUpperInner,
    LeftEyeInner,
    LeftEyeLowerInner,
    LeftEyeLowerOuter,
    RightEyeOuter,
    RightEyeUpperOuter,
    RightEyeUpperInner,
    RightEyeInner,
    RightEyeLowerInner,
    RightEyeLowerOuter,
    LeftIris,
    RightIris,
    LeftCheek,
    RightCheek,
    MouthLeft,
    MouthRight,
}

impl LandmarkPoint {
    pub const ALL: [LandmarkPoint; POINT_COUNT] = [
        LandmarkPoint::NoseTip,
        LandmarkPoint::LeftEyeOuter,
        LandmarkPoint::LeftEyeUpperOuter,
        LandmarkPoint::LeftEyeUpperInner,
        LandmarkPoint::LeftEyeInner,
        LandmarkPoint::LeftEyeLowerInner,
        LandmarkPoint::LeftEyeLowerOuter,
        LandmarkPoint::RightEyeOuter,
        LandmarkPoint::RightEyeUpperOuter,
        LandmarkPoint::RightEyeUpperInner,
        LandmarkPoint::RightEyeInner,
        LandmarkPoint::RightEyeLowerInner,
        LandmarkPoint::RightEyeLowerOuter,
        LandmarkPoint::LeftIris,
        LandmarkPoint::RightIris,
        LandmarkPoint::LeftCheek,
        LandmarkPoint::RightCheek,
        LandmarkPoint::MouthLeft,
        LandmarkPoint::MouthRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LandmarkPoint::NoseTip => "nose_tip",
            LandmarkPoint::LeftEyeOuter => "left_eye_outer",
            LandmarkPoint::LeftEyeUpperOuter => "left_eye_upper_outer",
            LandmarkPoint::LeftEyeUpperInner => "left_eye_upper_inner",
            LandmarkPoint::LeftEyeInner => "left_eye_inner",
            LandmarkPoint::LeftEyeLowerInner => "left_eye_lower_inner",
            LandmarkPoint::LeftEyeLowerOuter => "left_eye_lower_outer",
            LandmarkPoint::RightEyeOuter => "right_eye_outer",
            LandmarkPoint::RightEyeUpperOuter => "right_eye_upper_outer",
            LandmarkPoint::RightEyeUpperInner => "right_eye_upper_inner",
            LandmarkPoint::RightEyeInner => "right_eye_inner",
            LandmarkPoint::RightEyeLowerInner => "right_eye_lower_inner",
            LandmarkPoint::RightEyeLowerOuter => "right_eye_lower_outer",
            LandmarkPoint::LeftIris => "left_iris",
            LandmarkPoint::RightIris => "right_iris",
            LandmarkPoint::LeftCheek => "left_cheek",
            LandmarkPoint::RightCheek => "right_cheek",
            LandmarkPoint::MouthLeft => "mouth_left",
            LandmarkPoint::MouthRight => "mouth_right",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// FaceMesh indices shared by the 468 and 478 point models.
const MEDIAPIPE_FACE: [(LandmarkPoint, usize); 17] = [
    (LandmarkPoint::NoseTip, 1),
    (LandmarkPoint::LeftEyeOuter, 33),
    (LandmarkPoint::LeftEyeUpperOuter, 160),
    (LandmarkPoint::LeftEyeUpperInner, 158),
    (LandmarkPoint::LeftEyeInner, 133),
    (LandmarkPoint::LeftEyeLowerInner, 153),
    (LandmarkPoint::LeftEyeLowerOuter, 144),
    (LandmarkPoint::RightEyeOuter, 263),
    (LandmarkPoint::RightEyeUpperOuter, 387),
    (LandmarkPoint::RightEyeUpperInner, 385),
    (LandmarkPoint::RightEyeInner, 362),
    (LandmarkPoint::RightEyeLowerInner, 380),
    (LandmarkPoint::RightEyeLowerOuter, 373),
    (LandmarkPoint::LeftCheek, 234),
    (LandmarkPoint::RightCheek, 454),
    (LandmarkPoint::MouthLeft, 61),
    (LandmarkPoint::MouthRight, 291),
];

/// Iris centres, only emitted with `refineLandmarks: true`.
const MEDIAPIPE_IRIS: [(LandmarkPoint, usize); 2] =
    [(LandmarkPoint::LeftIris, 468), (LandmarkPoint::RightIris, 473)];

/// Maps semantic points to one detector's index layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandmarkLayout {
    name: &'static str,
    table: [Option<usize>; POINT_COUNT],
}

impl Default for LandmarkLayout {
    fn default() -> Self {
        Self::mediapipe_refined()
    }
}

impl LandmarkLayout {
    /// FaceMesh without iris refinement (468 points). Gaze stays unknown.
    pub fn mediapipe() -> Self {
        Self::custom("mediapipe-468", &MEDIAPIPE_FACE)
    }

    /// FaceMesh with iris refinement (478 points).
    pub fn mediapipe_refined() -> Self {
        let mut layout = Self::custom("mediapipe-478", &MEDIAPIPE_FACE);
        for &(point, index) in &MEDIAPIPE_IRIS {
            layout.table[point.slot()] = Some(index);
        }
        layout
    }

    /// Builds a layout from explicit `(point, index)` pairs. Points not
    /// listed are unmapped.
    pub fn custom(name: &'static str, mapping: &[(LandmarkPoint, usize)]) -> Self {
        let mut table = [None; POINT_COUNT];
        for &(point, index) in mapping {
            table[point.slot()] = Some(index);
        }
        Self { name, table }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn index_of(&self, point: LandmarkPoint) -> Option<usize> {
        self.table[point.slot()]
    }

    pub fn has(&self, point: LandmarkPoint) -> bool {
        self.index_of(point).is_some()
    }

    /// Looks up a named point in `frame`. Any failure (unmapped, index past
    /// the detector output, non-finite coordinate) is an error the caller
    /// must degrade to "no face".
    pub fn point(&self, frame: &FrameInput, point: LandmarkPoint) -> LivenessResult<Point> {
        let name = point.name();
        let index = self
            .index_of(point)
            .ok_or(LivenessError::LandmarkUnmapped { name })?;
        let p = frame
            .landmarks
            .get(index)
            .copied()
            .ok_or(LivenessError::LandmarkOutOfRange {
                name,
                index,
                len: frame.len(),
            })?;
        if !p.is_finite() {
            return Err(LivenessError::NonFiniteLandmark { name, index });
        }
        Ok(p)
    }
}
