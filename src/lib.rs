pub mod assemble;
pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod rectify;
pub mod session;

pub use assemble::PageAssembler;
pub use config::ScanConfig;
pub use detection::{DetectionTrace, DocumentDetector};
pub use error::{Result, ScanError};
pub use models::{CapturedPage, OrderedCorners, Point, Quad};
pub use session::{
    DetectionState, FrameSource, ImageSequenceSource, ScanSession, TickOutcome,
};
