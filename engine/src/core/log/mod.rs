//! Log sinks for applications built on the substrate. The library itself only emits through the
//! `log` facade and never installs a logger.

mod channel;

pub use channel::{ChannelLogger, LogMessage};
