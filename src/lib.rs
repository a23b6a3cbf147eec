//! Face liveness decision engine.
//!
//! Turns per-frame facial landmarks into biometric cues (blink, head pose,
//! gaze, distance, expression) and fuses them with a debounced blink
//! tracker into a real-user / spoof verdict.
//!
//! ## Modules
//! - `landmarks`: input points and the named-point layout table
//! - `geometry`: stateless per-frame metrics and `FrameSignals`
//! - `blink`: debounced blink counter and bounded history
//! - `fusion`: the conjunctive liveness rule
//! - `session`: per-session state, `update` and `reset`
//!
//! Ambiguous input always lands on the spoof side.

pub mod blink;
pub mod config;
pub mod error;
pub mod fusion;
pub mod geometry;
pub mod landmarks;
pub mod logging;
pub mod session;

pub use blink::{BlinkCounterState, BlinkHistory, BlinkTracker, BlinkTransition};
pub use config::LivenessConfig;
pub use error::{LivenessError, LivenessResult};
pub use fusion::{Guidance, LivenessChecks, Verdict};
pub use geometry::{extract_signals, FaceDistance, FrameSignals, GazeDirection};
pub use landmarks::{FrameInput, LandmarkLayout, LandmarkPoint, Point};
pub use session::{LivenessSession, SessionSnapshot};
