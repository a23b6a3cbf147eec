//! 眨眼时序跟踪模块
//!
//! 每帧根据当前帧的眨眼状态与距上次计数眨眼的时间进行一次转换：
//! - 眨眼且距上次计数超过去抖窗口（默认 300ms）：计数 +1，记录时间戳，历史追加 `true`
//! - 有人脸且未眨眼：历史追加 `false`
//! - 其余情况（去抖窗口内的眨眼帧、无人脸帧）：不追加、不计数
//!
//! 一次生理眨眼通常跨越多个连续闭眼帧，去抖窗口保证只计数一次。
//! 历史为固定容量 FIFO（默认 10），最新样本在末尾。

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::BlinkConfig;

/// 单帧转换结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkTransition {
    /// 去抖后的眨眼事件
    BlinkEdge,
    /// 有人脸、睁眼，追加一个 `false` 样本
    OpenSample,
    /// 去抖窗口内的眨眼帧或无人脸帧
    Ignored,
}

/// 眨眼计数状态
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlinkCounterState {
    /// 去抖后的眨眼次数，仅在重置时归零
    pub count: u32,
    /// 最近一次计数眨眼的时间戳（毫秒），重置后为 0
    pub last_blink_timestamp: f64,
}

/// 最近的逐帧眨眼样本，容量固定，超出时淘汰最旧样本
#[derive(Debug, Clone, PartialEq)]
pub struct BlinkHistory {
    samples: VecDeque<bool>,
    capacity: usize,
}

impl BlinkHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: bool) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 从旧到新遍历
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.samples.iter().copied()
    }

    /// 最新的 `n` 个样本中是否有眨眼
    pub fn any_recent(&self, n: usize) -> bool {
        self.samples.iter().rev().take(n).any(|&b| b)
    }

    pub fn to_vec(&self) -> Vec<bool> {
        self.samples.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// 眨眼时序跟踪器
#[derive(Debug, Clone)]
pub struct BlinkTracker {
    debounce_ms: f64,
    history: BlinkHistory,
    counter: BlinkCounterState,
}

impl BlinkTracker {
    pub fn new(config: &BlinkConfig) -> Self {
        Self {
            debounce_ms: config.debounce_ms,
            history: BlinkHistory::new(config.history_capacity),
            counter: BlinkCounterState::default(),
        }
    }

    /// 处理一帧
    ///
    /// # 参数
    /// - `is_blinking`: 当前帧是否眨眼
    /// - `has_face`: 当前帧是否检测到人脸
    /// - `timestamp`: 当前帧时间戳（毫秒）
    pub fn update(&mut self, is_blinking: bool, has_face: bool, timestamp: f64) -> BlinkTransition {
        if is_blinking && timestamp - self.counter.last_blink_timestamp > self.debounce_ms {
            self.counter.last_blink_timestamp = timestamp;
            self.counter.count = self.counter.count.saturating_add(1);
            self.history.push(true);
            tracing::debug!(
                count = self.counter.count,
                timestamp,
                "Debounced blink counted"
            );
            BlinkTransition::BlinkEdge
        } else if !is_blinking && has_face {
            self.history.push(false);
            BlinkTransition::OpenSample
        } else {
            BlinkTransition::Ignored
        }
    }

    pub fn history(&self) -> &BlinkHistory {
        &self.history
    }

    pub fn counter(&self) -> &BlinkCounterState {
        &self.counter
    }

    pub fn count(&self) -> u32 {
        self.counter.count
    }

    /// 清空历史、计数归零、时间戳归零
    pub fn reset(&mut self) {
        self.history.clear();
        self.counter = BlinkCounterState::default();
    }
}
