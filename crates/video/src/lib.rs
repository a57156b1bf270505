//! Frame source abstraction for the detection client.
//!
//! A capture worker keeps the most recent frame in a [`FrameSlot`]; consumers
//! sample it on their own cadence through the [`FrameSource`] trait and never
//! block the capture loop.

mod error;
pub use error::*;

mod slot;
pub use slot::*;

mod source;
pub use source::*;

pub mod videoin;
pub use videoin::{StillImageConfig, TestPatternConfig, VideoIn, VideoInConfig};
