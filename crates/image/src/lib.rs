//! Image types and codecs for frame transmission.
//!
//! Frames arrive from capture devices in a raw pixel format, get converted to
//! RGB and are compressed to JPEG before they go over the wire. The
//! streaming transport additionally needs the JPEG as a text-safe data URL.

mod dataurl;
pub use dataurl::*;

mod error;
pub use error::*;

mod image;
pub use image::*;

mod jpeg;
pub use jpeg::*;

mod pixelformat;
pub use pixelformat::*;

mod rgb;
pub use rgb::*;
