use face_liveness::landmarks::{FrameInput, LandmarkLayout, LandmarkPoint, Point};

/// Refined FaceMesh frame size.
pub const LANDMARK_COUNT: usize = 478;

const FRAME_W: f64 = 640.0;
const FRAME_H: f64 = 480.0;
const EYE_WIDTH: f64 = 0.08;
const EYE_Y: f64 = 0.45;

/// Synthetic frontal face with tunable geometry, laid out on the refined
/// MediaPipe indices.
#[derive(Debug, Clone)]
pub struct FaceBuilder {
    /// Target EAR for both eyes.
    pub ear: f64,
    /// Horizontal nose offset from the eye midpoint (normalised).
    pub nose_shift: f64,
    /// Iris offset inside each eye as a fraction of eye width.
    pub iris_shift: f64,
    /// Cheek-to-cheek span (normalised).
    pub face_width: f64,
    /// Extra outward offset of the right mouth corner (normalised).
    pub mouth_skew: f64,
    pub mouth_half_width: f64,
}

impl Default for FaceBuilder {
    fn default() -> Self {
        Self {
            ear: 0.32,
            nose_shift: 0.0,
            iris_shift: 0.0,
            face_width: 0.4,
            mouth_skew: 0.0,
            mouth_half_width: 0.07,
        }
    }
}

impl FaceBuilder {
    pub fn open() -> Self {
        Self::default()
    }

    pub fn blinking() -> Self {
        Self {
            ear: 0.08,
            ..Self::default()
        }
    }

    pub fn ear(mut self, ear: f64) -> Self {
        self.ear = ear;
        self
    }

    pub fn nose_shift(mut self, shift: f64) -> Self {
        self.nose_shift = shift;
        self
    }

    pub fn iris_shift(mut self, shift: f64) -> Self {
        self.iris_shift = shift;
        self
    }

    pub fn face_width(mut self, width: f64) -> Self {
        self.face_width = width;
        self
    }

    pub fn mouth_skew(mut self, skew: f64) -> Self {
        self.mouth_skew = skew;
        self
    }

    pub fn build(&self) -> FrameInput {
        let layout = LandmarkLayout::mediapipe_refined();
        let mut landmarks = vec![Point::new(0.5, 0.5); LANDMARK_COUNT];
        let mut set = |name: LandmarkPoint, x: f64, y: f64| {
            let index = layout.index_of(name).expect("refined layout maps every point");
            landmarks[index] = Point::with_depth(x, y, 0.0);
        };

        // vertical lid gap giving the requested EAR in pixel space
        let gap = self.ear * EYE_WIDTH * FRAME_W / FRAME_H;
        let third = EYE_WIDTH / 3.0;

        let l_outer = 0.38;
        let l_inner = l_outer + EYE_WIDTH;
        set(LandmarkPoint::LeftEyeOuter, l_outer, EYE_Y);
        set(LandmarkPoint::LeftEyeInner, l_inner, EYE_Y);
        set(LandmarkPoint::LeftEyeUpperOuter, l_outer + third, EYE_Y - gap / 2.0);
        set(LandmarkPoint::LeftEyeLowerOuter, l_outer + third, EYE_Y + gap / 2.0);
        set(LandmarkPoint::LeftEyeUpperInner, l_inner - third, EYE_Y - gap / 2.0);
        set(LandmarkPoint::LeftEyeLowerInner, l_inner - third, EYE_Y + gap / 2.0);

        let r_inner = 0.54;
        let r_outer = r_inner + EYE_WIDTH;
        set(LandmarkPoint::RightEyeInner, r_inner, EYE_Y);
        set(LandmarkPoint::RightEyeOuter, r_outer, EYE_Y);
        set(LandmarkPoint::RightEyeUpperInner, r_inner + third, EYE_Y - gap / 2.0);
        set(LandmarkPoint::RightEyeLowerInner, r_inner + third, EYE_Y + gap / 2.0);
        set(LandmarkPoint::RightEyeUpperOuter, r_outer - third, EYE_Y - gap / 2.0);
        set(LandmarkPoint::RightEyeLowerOuter, r_outer - third, EYE_Y + gap / 2.0);

        let iris_offset = self.iris_shift * EYE_WIDTH;
        set(LandmarkPoint::LeftIris, (l_outer + l_inner) / 2.0 + iris_offset, EYE_Y);
        set(LandmarkPoint::RightIris, (r_inner + r_outer) / 2.0 + iris_offset, EYE_Y);

        let eye_mid = (l_outer + r_outer) / 2.0;
        set(LandmarkPoint::NoseTip, eye_mid + self.nose_shift, 0.55);

        set(LandmarkPoint::LeftCheek, 0.5 - self.face_width / 2.0, 0.5);
        set(LandmarkPoint::RightCheek, 0.5 + self.face_width / 2.0, 0.5);

        set(LandmarkPoint::MouthLeft, 0.5 - self.mouth_half_width, 0.68);
        set(
            LandmarkPoint::MouthRight,
            0.5 + self.mouth_half_width + self.mouth_skew,
            0.68,
        );

        FrameInput::new(landmarks)
    }
}

/// Frame timestamps spaced at ~30 fps starting at `start_ms`.
pub fn frame_times(start_ms: f64, frames: usize) -> impl Iterator<Item = f64> {
    (0..frames).map(move |i| start_ms + 33.0 * i as f64)
}
