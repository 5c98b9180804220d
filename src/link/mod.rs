// Wireless joystick link
//
// Provides:
// - Byte framing protocol decoder (start marker, fixed payload, checksum)
// - Serial byte source and the background reader publishing samples

pub mod frame;
pub mod serial;

pub use frame::{ByteSource, FrameDecoder, FrameEvent, encode_frame};
pub use serial::{LinkError, SerialSource, spawn_reader};
