//! Candidate detections and overlap suppression.

pub(crate) mod detection;
pub(crate) mod nms;
