// Joystick monitor: READ-ONLY check of the wireless link
//
// Decodes frames from the receiver port and prints every sample and
// checksum failure. Does not touch the motors.
//
// Usage: cargo run --example joystick_monitor -- [port]
// Example: cargo run --example joystick_monitor -- /dev/ttyUSB0

use rover_joystick_runtime::config::{JOYSTICK_BAUDRATE, JOYSTICK_PORT};
use rover_joystick_runtime::link::frame::{FrameDecoder, FrameEvent};
use rover_joystick_runtime::link::SerialSource;
use rover_joystick_runtime::motor::mixing;
use std::thread::sleep;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("debug".parse().unwrap()),
        )
        .init();

    // Get port from args or use default
    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| JOYSTICK_PORT.to_string());

    println!("Listening on {} ({} baud), Ctrl+C to quit", port, JOYSTICK_BAUDRATE);
    println!();

    let mut source = SerialSource::open(&port, JOYSTICK_BAUDRATE)?;
    let mut decoder = FrameDecoder::new();

    loop {
        for event in decoder.drain(&mut source)? {
            match event {
                FrameEvent::Frame { x, y } => {
                    let (speed_a, speed_b) = mixing::mix(x, y);
                    println!("X: {} / Y: {} -- A: {} / B: {}", x, y, speed_a, speed_b);
                }
                FrameEvent::ChecksumMismatch { received, expected } => {
                    println!("Checksum mismatch: got {}, expected {}", received, expected);
                }
            }
        }

        sleep(Duration::from_millis(10));
    }
}
