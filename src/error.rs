use thiserror::Error;

#[derive(Debug, Error)]
pub enum LivenessError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("landmark out of range: point={name}, index={index}, len={len}")]
    LandmarkOutOfRange {
        name: &'static str,
        index: usize,
        len: usize,
    },
    #[error("landmark not mapped by layout: point={name}")]
    LandmarkUnmapped { name: &'static str },
    #[error("non-finite landmark coordinate: point={name}, index={index}")]
    NonFiniteLandmark { name: &'static str, index: usize },
    #[error("malformed landmark buffer: len={len}, stride={stride}")]
    MalformedLandmarks { len: usize, stride: usize },
}

pub type LivenessResult<T> = Result<T, LivenessError>;
