mod code;
mod packet;

pub use code::Code;
pub use packet::{Packet, PacketError};
