// Serial byte source for the wireless joystick link
//
// The receiver shows up as a plain serial device (9600 8-N-1). A dedicated
// reader thread drains it through the frame decoder and publishes samples;
// the control loop only ever sees the latest value.

use std::io::Read;
use std::thread;
use std::time::Duration;

use serialport::{self, SerialPort};
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::link::frame::{ByteSource, FrameDecoder, FrameEvent};
use crate::messages::JoystickSample;

/// Reader poll interval while the port is idle. At 9600 baud a byte takes
/// roughly a millisecond on the wire.
const IDLE_POLL: Duration = Duration::from_millis(1);

/// Error types for the joystick link
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serial-port-backed byte source
pub struct SerialSource {
    port: Box<dyn SerialPort>,
}

impl SerialSource {
    pub fn open(port_name: &str, baudrate: u32) -> Result<Self, LinkError> {
        let port = serialport::new(port_name, baudrate)
            .timeout(Duration::from_millis(100))
            .open()?;

        Ok(Self { port })
    }
}

impl ByteSource for SerialSource {
    fn has_bytes(&mut self) -> bool {
        self.port.bytes_to_read().map(|n| n > 0).unwrap_or(false)
    }

    fn read_byte(&mut self) -> std::io::Result<u8> {
        let mut byte = [0u8; 1];
        self.port.read_exact(&mut byte)?;
        Ok(byte[0])
    }
}

/// Spawn the link reader thread.
///
/// Each pass drains whatever bytes are buffered, feeds them through the
/// decoder and publishes completed frames into `samples`. A valid frame
/// replaces the whole sample in one operation; a failed checksum only flips
/// `valid`, leaving the previous axes in place. An empty port is not an
/// error; the thread just checks again. A read error ends the thread, which
/// closes the channel and lets the control loop's watchdog take over.
pub fn spawn_reader<S>(
    mut source: S,
    samples: watch::Sender<JoystickSample>,
) -> Result<thread::JoinHandle<()>, LinkError>
where
    S: ByteSource + Send + 'static,
{
    let handle = thread::Builder::new()
        .name("joystick-rx".into())
        .spawn(move || {
            let mut decoder = FrameDecoder::new();
            info!("Joystick link reader started");

            loop {
                let events = match decoder.drain(&mut source) {
                    Ok(events) => events,
                    Err(e) => {
                        error!("Joystick link read failed: {}", e);
                        break;
                    }
                };

                for event in events {
                    match event {
                        FrameEvent::Frame { x, y } => {
                            samples.send_replace(JoystickSample { x, y, valid: true });
                        }
                        FrameEvent::ChecksumMismatch { received, expected } => {
                            warn!("Checksum mismatch: got {}, expected {}", received, expected);
                            samples.send_modify(|sample| sample.valid = false);
                        }
                    }
                }

                thread::sleep(IDLE_POLL);
            }
        })?;

    Ok(handle)
}
