mod epoch;
pub use epoch::*;

pub mod log;
pub use log::{Level, Logger, init_file_logger, init_stdout_logger};

mod rect;
pub use rect::*;

mod vec2;
pub use vec2::*;
