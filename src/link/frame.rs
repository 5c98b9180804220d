// Joystick frame protocol
//
// Wire format: [0x00, 0xFF, payload x 6, checksum]
// payload[0] = X axis, payload[1] = Y axis, payload[2..6] reserved.
// The checksum is the wrapping 8-bit sum of the six payload bytes.

use std::io;

/// Frame start marker
pub const MARKER: [u8; 2] = [0x00, 0xFF];

/// Payload bytes per frame
pub const PAYLOAD_LEN: usize = 6;

/// Total frame length: marker + payload + checksum
pub const FRAME_LEN: usize = MARKER.len() + PAYLOAD_LEN + 1;

/// Abstract byte stream the decoder consumes from
pub trait ByteSource {
    /// Whether at least one byte can be read without blocking
    fn has_bytes(&mut self) -> bool;

    /// Read the next byte. Only called after `has_bytes` returned true.
    fn read_byte(&mut self) -> io::Result<u8>;
}

/// Outcome of a completed frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    /// Checksum matched; the decoded axes
    Frame { x: u8, y: u8 },
    /// Checksum failed; the frame is dropped
    ChecksumMismatch { received: u8, expected: u8 },
}

/// Byte-at-a-time frame decoder with automatic resynchronization on the
/// start marker.
pub struct FrameDecoder {
    prev_byte: u8,
    reading: bool,
    payload: [u8; PAYLOAD_LEN],
    pos: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            prev_byte: 0xFF,
            reading: false,
            payload: [0; PAYLOAD_LEN],
            pos: 0,
        }
    }

    /// Two-byte sliding marker detection. `prev_byte` is updated on every
    /// call, whatever the current state.
    fn starts_frame(&mut self, byte: u8) -> bool {
        let hit = self.prev_byte == MARKER[0] && byte == MARKER[1];
        self.prev_byte = byte;
        hit
    }

    /// Process a single byte. Returns an event when the byte completes a
    /// frame. A marker seen mid-payload silently abandons the partial frame
    /// and starts over.
    pub fn push(&mut self, byte: u8) -> Option<FrameEvent> {
        if self.starts_frame(byte) {
            self.reading = true;
            self.pos = 0;
            return None;
        }

        if !self.reading {
            return None;
        }

        if self.pos < PAYLOAD_LEN {
            self.payload[self.pos] = byte;
            self.pos += 1;
            return None;
        }

        // Payload complete, this byte is the checksum
        self.reading = false;
        let expected = checksum(&self.payload);
        if byte == expected {
            Some(FrameEvent::Frame {
                x: self.payload[0],
                y: self.payload[1],
            })
        } else {
            Some(FrameEvent::ChecksumMismatch {
                received: byte,
                expected,
            })
        }
    }

    /// Drain every byte currently available from `source`. Never blocks:
    /// consumes exactly what is buffered at call time and returns the
    /// events produced.
    pub fn drain<S: ByteSource>(&mut self, source: &mut S) -> io::Result<Vec<FrameEvent>> {
        let mut events = Vec::new();
        while source.has_bytes() {
            if let Some(event) = self.push(source.read_byte()?) {
                events.push(event);
            }
        }
        Ok(events)
    }
}

/// Wrapping 8-bit sum of the payload bytes
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Build a complete frame for the given axes (marker, zero-filled reserved
/// bytes, checksum). Inverse of the decoder; used by the teleop sender.
pub fn encode_frame(x: u8, y: u8) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[..MARKER.len()].copy_from_slice(&MARKER);
    frame[2] = x;
    frame[3] = y;
    frame[FRAME_LEN - 1] = checksum(&frame[2..2 + PAYLOAD_LEN]);
    frame
}
