use clap::Parser;
use tracing_subscriber::EnvFilter;

use rover_joystick_runtime::config;
use rover_joystick_runtime::runtime::{self, RunOptions};

/// Joystick-driven differential-drive runtime
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Serial port of the wireless joystick receiver
    #[arg(long, default_value = config::JOYSTICK_PORT)]
    joystick_port: String,

    /// Serial port of the motor controller
    #[arg(long, default_value = config::MOTOR_PORT)]
    motor_port: String,

    /// Decode and publish telemetry without driving the motors
    #[arg(long)]
    no_motors: bool,
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init(); // installs the subscriber globally

    let args = Args::parse();
    let opts = RunOptions {
        joystick_port: args.joystick_port,
        motor_port: args.motor_port,
        motors_enabled: !args.no_motors,
    };

    if let Err(e) = runtime::run(opts).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
