// Motor test: careful, step-by-step test of both drive channels
//
// IMPORTANT: Run joystick_monitor first to verify the link, and put the
// rover on a stand - the wheels WILL turn.
//
// Usage: cargo run --example motor_test -- [port]
// Example: cargo run --example motor_test -- /dev/ttyUSB1
//
// Safety features:
// - Explicit confirmation before each movement
// - Very low test duty
// - Easy abort with Ctrl+C

use rover_joystick_runtime::config::MOTOR_PORT;
use rover_joystick_runtime::motor::mixing::Direction;
use rover_joystick_runtime::motor::sabertooth::{Motor, SabertoothBus};
use std::io::{self, Write};
use std::thread::sleep;
use std::time::Duration;

const TEST_DUTY: u8 = 20;

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush().unwrap();
    let mut input = String::new();
    io::stdin().read_line(&mut input).unwrap();
    input.trim().eq_ignore_ascii_case("y")
}

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
        .unwrap_or_else(|| MOTOR_PORT.to_string());

    println!("Motor test (WITH MOVEMENT)");
    println!("Serial port: {}", port);
    println!();

    if !confirm("Are the wheels off the ground?") {
        println!("Put the rover on a stand first.");
        return Ok(());
    }

    let mut bus = SabertoothBus::open(&port)?;
    bus.initialize()?;
    println!("Controller initialized.");
    println!();

    for (motor, name) in [(Motor::A, "A"), (Motor::B, "B")] {
        for direction in [Direction::Forward, Direction::Reverse] {
            if !confirm(&format!(
                "Run motor {} {:?} at {}% for 2s?",
                name, direction, TEST_DUTY
            )) {
                continue;
            }

            bus.drive(motor, direction, TEST_DUTY)?;
            sleep(Duration::from_secs(2));
            bus.drive(motor, direction, 0)?;
            sleep(Duration::from_millis(500));
        }
    }

    println!("Done.");
    Ok(())
}
