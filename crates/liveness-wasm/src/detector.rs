//! 活体检测器（WASM 导出）
//!
//! 浏览器端持有摄像头和 MediaPipe FaceMesh，每帧把关键点展平成
//! `Float32Array` 传入本检测器，返回当前会话快照。
//!
//! 坐标缓冲区格式：`[x0, y0, z0, x1, y1, z1, ...]`（stride = 3）
//! 或 `[x0, y0, x1, y1, ...]`（stride = 2），坐标为归一化值 (0.0-1.0)。

use face_liveness::{
    FrameInput, FrameSignals, LandmarkLayout, LivenessConfig, LivenessResult, LivenessSession,
    SessionSnapshot,
};
use wasm_bindgen::prelude::*;

/// 活体检测器
///
/// 封装一个 `LivenessSession`，一个检测器对应一次验证会话。
#[wasm_bindgen]
pub struct LivenessDetector {
    session: LivenessSession,
}

impl Default for LivenessDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl LivenessDetector {
    /// 使用默认阈值创建检测器
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            session: LivenessSession::default(),
        }
    }

    /// 使用 JSON 配置创建检测器
    ///
    /// 配置字段为 camelCase，缺省字段取默认值，例如
    /// `{"blink": {"debounceMs": 250}}`。
    #[wasm_bindgen(js_name = "withConfig")]
    pub fn with_config(json: &str) -> Result<LivenessDetector, JsError> {
        Self::from_config_json(json).map_err(|e| JsError::new(&e.to_string()))
    }

    /// 切换关键点布局
    ///
    /// - `"mediapipe_refined"`: 478 点（含虹膜），默认
    /// - `"mediapipe"`: 468 点（无虹膜，视线方向恒为 unknown）
    ///
    /// 返回是否识别该布局名。
    #[wasm_bindgen(js_name = "setLayout")]
    pub fn set_layout(&mut self, name: &str) -> bool {
        let layout = match name {
            "mediapipe_refined" => LandmarkLayout::mediapipe_refined(),
            "mediapipe" => LandmarkLayout::mediapipe(),
            _ => return false,
        };
        self.session = std::mem::take(&mut self.session).with_layout(layout);
        true
    }

    /// 处理一帧关键点
    ///
    /// # 参数
    /// - `flat_coords`: 展平后的关键点坐标；未检测到人脸时传空数组
    /// - `stride`: 每个点的分量数（2 或 3）
    /// - `timestamp_ms`: 当前时间戳（毫秒）
    ///
    /// # 返回
    /// 序列化为 JsValue 的 SessionSnapshot
    #[wasm_bindgen(js_name = "processFrame")]
    pub fn process_frame(
        &mut self,
        flat_coords: &js_sys::Float32Array,
        stride: usize,
        timestamp_ms: f64,
    ) -> JsValue {
        let coords: Vec<f64> = flat_coords.to_vec().into_iter().map(f64::from).collect();
        let snapshot = self.process_flat(&coords, stride, timestamp_ms);
        to_js(&snapshot)
    }

    /// 直接传入宿主计算好的帧信号（`FrameSignals` 的 camelCase 对象）
    ///
    /// 无法解析的对象按"未检测到人脸"处理。
    #[wasm_bindgen(js_name = "updateSignals")]
    pub fn update_signals(&mut self, signals: JsValue, timestamp_ms: f64) -> JsValue {
        let signals: FrameSignals = serde_wasm_bindgen::from_value(signals).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Unreadable frame signals, treating as no face");
            FrameSignals::no_face()
        });
        to_js(&self.session.update(signals, timestamp_ms))
    }

    /// 重置眨眼历史与计数
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// 当前是否判定为真人
    #[wasm_bindgen(js_name = "isRealUser")]
    pub fn is_real_user(&self) -> bool {
        self.session.verdict()
    }

    /// 已计数的眨眼次数
    #[wasm_bindgen(js_name = "getBlinkCount")]
    pub fn get_blink_count(&self) -> u32 {
        self.session.blink_counter().count
    }

    /// 当前提示语（状态面板显示用）
    #[wasm_bindgen(js_name = "getGuidance")]
    pub fn get_guidance(&self) -> String {
        self.session.guidance().message().to_string()
    }

    /// 眨眼历史（从旧到新）
    #[wasm_bindgen(js_name = "getBlinkHistory")]
    pub fn get_blink_history(&self) -> js_sys::Array {
        self.session
            .blink_history()
            .iter()
            .map(JsValue::from_bool)
            .collect()
    }

    /// 完整会话快照
    #[wasm_bindgen(js_name = "getSnapshot")]
    pub fn get_snapshot(&self) -> JsValue {
        to_js(&self.session.snapshot())
    }
}

impl LivenessDetector {
    pub fn from_config_json(json: &str) -> LivenessResult<Self> {
        let config = LivenessConfig::from_json(json)?;
        Ok(Self {
            session: LivenessSession::new(config)?,
        })
    }

    /// 处理展平坐标；格式错误的缓冲区按空帧处理
    pub fn process_flat(
        &mut self,
        coords: &[f64],
        stride: usize,
        timestamp_ms: f64,
    ) -> SessionSnapshot {
        let frame = FrameInput::from_flat(coords, stride).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Malformed landmark buffer, treating as no face");
            FrameInput::empty()
        });
        self.session.process_frame(&frame, timestamp_ms)
    }

    pub fn session(&self) -> &LivenessSession {
        &self.session
    }
}

fn to_js(snapshot: &SessionSnapshot) -> JsValue {
    serde_wasm_bindgen::to_value(snapshot).unwrap_or(JsValue::NULL)
}
