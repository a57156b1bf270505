//! Dual-transport frame dispatch.
//!
//! Frames from one shared [`video::FrameSource`] are sampled on a fixed
//! cadence and sent to a remote detector over two independent channels:
//!
//! - the polling channel issues one HTTP request per frame and waits for the
//!   answer,
//! - the streaming channel pushes frames over a persistent WebSocket and
//!   handles replies as they arrive.
//!
//! Each channel is a single tokio task. It allows at most one outstanding
//! frame, drops ticks while busy, draws results onto its own render target
//! and publishes [`ChannelMetrics`] through a watch channel. A [`Session`]
//! owns the source and both channels.

mod error;
pub use error::*;

mod config;
pub use config::*;

mod detection;
pub use detection::*;

mod metrics;
pub use metrics::*;

mod sampler;
pub use sampler::*;

pub mod overlay;
pub use overlay::{Color, OverlayCanvas, RenderTarget, render};

pub mod transport;
pub use transport::{
    FrameSender, PollTransport, ResultReceiver, StreamConnector, StreamEvent, WsConnector,
};

pub mod channel;
pub use channel::{ChannelHandle, ChannelKind, ChannelState};

mod session;
pub use session::*;
