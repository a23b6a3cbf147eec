//! Session state: the aggregate the host reads once per frame.
//!
//! A session is owned by exactly one processing path. `update` takes
//! `&mut self`, so frames are folded in strictly one at a time; hosts with
//! overlapping detector callbacks must serialise their calls.

use serde::Serialize;

use crate::blink::{BlinkCounterState, BlinkHistory, BlinkTracker};
use crate::config::LivenessConfig;
use crate::error::LivenessResult;
use crate::fusion::{self, Guidance, LivenessChecks, Verdict};
use crate::geometry::{self, FrameSignals};
use crate::landmarks::{FrameInput, LandmarkLayout};

/// Published state after one frame (or after a reset).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub frame_signals: FrameSignals,
    /// Oldest first.
    pub blink_history: Vec<bool>,
    pub blink_counter: BlinkCounterState,
    pub verdict: bool,
    pub checks: LivenessChecks,
    pub guidance: Guidance,
    pub frames_processed: u64,
}

#[derive(Debug, Clone)]
pub struct LivenessSession {
    config: LivenessConfig,
    layout: LandmarkLayout,
    frame_signals: FrameSignals,
    tracker: BlinkTracker,
    checks: LivenessChecks,
    verdict: Verdict,
    frames_processed: u64,
    verdict_transitions: u64,
}

impl Default for LivenessSession {
    fn default() -> Self {
        Self::build(LivenessConfig::default(), LandmarkLayout::default())
    }
}

impl LivenessSession {
    pub fn new(config: LivenessConfig) -> LivenessResult<Self> {
        config.validate()?;
        Ok(Self::build(config, LandmarkLayout::default()))
    }

    pub fn with_layout(mut self, layout: LandmarkLayout) -> Self {
        self.layout = layout;
        self
    }

    fn build(config: LivenessConfig, layout: LandmarkLayout) -> Self {
        let tracker = BlinkTracker::new(&config.blink);
        Self {
            config,
            layout,
            frame_signals: FrameSignals::no_face(),
            tracker,
            checks: LivenessChecks::default(),
            verdict: Verdict::Spoof,
            frames_processed: 0,
            verdict_transitions: 0,
        }
    }

    /// Runs geometry extraction on raw landmarks, then [`Self::update`].
    pub fn process_frame(&mut self, frame: &FrameInput, timestamp_ms: f64) -> SessionSnapshot {
        let signals = geometry::extract_signals(frame, &self.layout, &self.config.geometry);
        self.update(signals, timestamp_ms)
    }

    /// Folds one frame's signals in: blink tracker first, then fusion.
    ///
    /// Signals claiming no landmarks are normalised to the no-face default
    /// before use, so a stale flag from the host can never count a blink.
    /// Expression confidence is clamped into `[0,1]`, NaN becoming 0.
    pub fn update(&mut self, signals: FrameSignals, timestamp_ms: f64) -> SessionSnapshot {
        let signals = normalize(signals);

        self.tracker
            .update(signals.is_blinking, signals.has_face(), timestamp_ms);
        self.frame_signals = signals;
        self.frames_processed += 1;
        self.refresh_verdict();

        self.snapshot()
    }

    /// Clears blink history, blink count and last-blink time. The latest
    /// frame signals are kept; the verdict is re-evaluated against them.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.refresh_verdict();
        tracing::info!(frames = self.frames_processed, "Liveness session reset");
    }

    fn refresh_verdict(&mut self) {
        self.checks = fusion::evaluate_checks(
            &self.frame_signals,
            self.tracker.history(),
            self.tracker.counter(),
            &self.config.fusion,
        );
        let next = Verdict::from_live(self.checks.all_passed());
        if next != self.verdict {
            self.verdict_transitions += 1;
            tracing::info!(
                from = ?self.verdict,
                to = ?next,
                blinks = self.tracker.count(),
                frame = self.frames_processed,
                "Liveness verdict changed"
            );
            self.verdict = next;
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            frame_signals: self.frame_signals.clone(),
            blink_history: self.tracker.history().to_vec(),
            blink_counter: *self.tracker.counter(),
            verdict: self.verdict.is_real(),
            checks: self.checks,
            guidance: Guidance::from_checks(&self.checks),
            frames_processed: self.frames_processed,
        }
    }

    pub fn verdict(&self) -> bool {
        self.verdict.is_real()
    }

    pub fn verdict_state(&self) -> Verdict {
        self.verdict
    }

    pub fn verdict_transitions(&self) -> u64 {
        self.verdict_transitions
    }

    pub fn frame_signals(&self) -> &FrameSignals {
        &self.frame_signals
    }

    pub fn blink_history(&self) -> &BlinkHistory {
        self.tracker.history()
    }

    pub fn blink_counter(&self) -> &BlinkCounterState {
        self.tracker.counter()
    }

    pub fn checks(&self) -> &LivenessChecks {
        &self.checks
    }

    pub fn guidance(&self) -> Guidance {
        Guidance::from_checks(&self.checks)
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn config(&self) -> &LivenessConfig {
        &self.config
    }

    pub fn layout(&self) -> &LandmarkLayout {
        &self.layout
    }
}

fn normalize(mut signals: FrameSignals) -> FrameSignals {
    if !signals.has_face() {
        return FrameSignals::no_face();
    }
    signals.expression_confidence = if signals.expression_confidence.is_nan() {
        0.0
    } else {
        signals.expression_confidence.clamp(0.0, 1.0)
    };
    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{FaceDistance, GazeDirection};

    fn live_signals(is_blinking: bool) -> FrameSignals {
        FrameSignals {
            is_blinking,
            head_pose_valid: true,
            eye_gaze_direction: GazeDirection::Center,
            face_distance: FaceDistance::Optimal,
            is_smiling: false,
            expression_confidence: 0.9,
            landmark_count: 478,
        }
    }

    #[test]
    fn starts_as_spoof_with_defaults() {
        let session = LivenessSession::default();
        assert!(!session.verdict());
        assert_eq!(*session.frame_signals(), FrameSignals::no_face());
        assert!(session.blink_history().is_empty());
        assert_eq!(session.blink_counter().count, 0);
        assert_eq!(session.guidance(), Guidance::PositionFace);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = LivenessConfig::default();
        cfg.blink.history_capacity = 0;
        assert!(LivenessSession::new(cfg).is_err());
    }

    #[test]
    fn blink_then_open_is_live() {
        let mut session = LivenessSession::default();
        session.update(live_signals(false), 1000.0);
        let snap = session.update(live_signals(true), 1033.0);
        assert!(snap.verdict);
        assert_eq!(snap.blink_counter.count, 1);
        assert_eq!(snap.guidance, Guidance::Verified);
        assert_eq!(session.verdict_transitions(), 1);
    }

    #[test]
    fn no_face_signal_with_stale_blink_flag_is_ignored() {
        let mut session = LivenessSession::default();
        let mut bogus = live_signals(true);
        bogus.landmark_count = 0;
        let snap = session.update(bogus, 5000.0);
        assert_eq!(snap.blink_counter.count, 0);
        assert!(snap.blink_history.is_empty());
        assert_eq!(snap.frame_signals, FrameSignals::no_face());
        assert!(!snap.verdict);
    }

    #[test]
    fn host_confidence_is_clamped_into_unit_range() {
        let mut session = LivenessSession::default();
        session.update(live_signals(true), 1000.0);

        let mut inflated = live_signals(false);
        inflated.expression_confidence = 5.0;
        let snap = session.update(inflated, 1033.0);
        assert_eq!(snap.frame_signals.expression_confidence, 1.0);
        assert!(snap.verdict);

        let mut negative = live_signals(false);
        negative.expression_confidence = -3.0;
        let snap = session.update(negative, 1066.0);
        assert_eq!(snap.frame_signals.expression_confidence, 0.0);
        assert!(!snap.checks.expression_ok);

        let mut nan = live_signals(false);
        nan.expression_confidence = f64::NAN;
        let snap = session.update(nan, 1099.0);
        assert_eq!(snap.frame_signals.expression_confidence, 0.0);
        assert!(!snap.verdict);
    }

    #[test]
    fn reset_keeps_frame_signals_and_drops_verdict() {
        let mut session = LivenessSession::default();
        session.update(live_signals(true), 1000.0);
        assert!(session.verdict());

        session.reset();
        assert_eq!(*session.frame_signals(), live_signals(true));
        assert!(session.blink_history().is_empty());
        assert_eq!(*session.blink_counter(), BlinkCounterState::default());
        assert!(!session.verdict());
        assert_eq!(session.guidance(), Guidance::BlinkNaturally);
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let mut session = LivenessSession::default();
        let snap = session.update(live_signals(false), 1000.0);
        let json = serde_json::to_value(&snap).expect("serialize");
        assert_eq!(json["verdict"], false);
        assert_eq!(json["blinkCounter"]["count"], 0);
        assert_eq!(json["blinkHistory"], serde_json::json!([false]));
        assert_eq!(json["guidance"], "blinkNaturally");
        assert_eq!(json["framesProcessed"], 1);
    }
}
