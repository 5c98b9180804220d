// Keyboard joystick stand-in: WASD steer, SPACE center, Q quit
//
// Encodes well-formed frames onto a serial port so the runtime can be
// exercised without the RF hardware (wire this port to the receiver input,
// or use a pty pair).
//
// Usage: cargo run --example joystick_sender -- [port]

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use rover_joystick_runtime::config::JOYSTICK_BAUDRATE;
use rover_joystick_runtime::link::frame::encode_frame;
use std::io::Write;
use std::time::Duration;

const STEP: i16 = 24;
const CENTER: i16 = 128;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let port_name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyUSB2".to_string());

    let mut port = serialport::new(&port_name, JOYSTICK_BAUDRATE)
        .timeout(Duration::from_millis(100))
        .open()?;

    println!("Sending frames to {}", port_name);
    println!("Controls: WASD=steer, SPACE=center, Q=quit");

    enable_raw_mode()?;
    let result = run_sender(&mut port);
    disable_raw_mode()?;

    result
}

fn run_sender(
    port: &mut Box<dyn serialport::SerialPort>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut x: i16 = CENTER;
    let mut y: i16 = CENTER;

    loop {
        // Poll for key with 50ms timeout (~20Hz frame rate)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;

                match code {
                    KeyCode::Char('w') if pressed => y = (y + STEP).min(255),
                    KeyCode::Char('s') if pressed => y = (y - STEP).max(0),
                    KeyCode::Char('d') if pressed => x = (x + STEP).min(255),
                    KeyCode::Char('a') if pressed => x = (x - STEP).max(0),
                    KeyCode::Char(' ') if pressed => {
                        x = CENTER;
                        y = CENTER;
                    }
                    KeyCode::Char('q') if pressed => break,
                    _ => {}
                }
            }
        }

        let frame = encode_frame(x as u8, y as u8);
        port.write_all(&frame)?;
        port.flush()?;
    }

    Ok(())
}
