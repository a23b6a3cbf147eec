//! 人脸活体检测 WASM 库
//!
//! 将 `face-liveness` 决策引擎编译为 WebAssembly，在浏览器端逐帧判定
//! 摄像头前是否为真人（而非照片或视频回放）。
//!
//! 摄像头采集和 MediaPipe FaceMesh 推理由宿主页面负责，本库只接收
//! 每帧的关键点坐标和时间戳。
//!
//! ## 模块
//! - `detector`: `LivenessDetector`，对外导出的会话封装

pub mod detector;

// 重新导出核心类型，方便外部使用
pub use detector::LivenessDetector;
pub use face_liveness::{FrameSignals, Guidance, SessionSnapshot};
