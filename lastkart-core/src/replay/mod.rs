mod packets;
mod stream;

pub use packets::*;
pub use stream::{ReplayError, ReplayReader, ReplayWriter};
