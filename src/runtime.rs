// 50 Hz control loop with link watchdog
//
// The reader thread publishes the newest joystick sample; this loop turns
// it into motor commands. A frame that failed its checksum holds the
// previous command; a link silent past the watchdog window stops the base.

use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, info, warn};

// local imports
use crate::config::{JOYSTICK_BAUDRATE, LINK_TIMEOUT, LOOP_HZ, TOPIC_DRIVE, TOPIC_HEALTH};
use crate::link::{self, SerialSource};
use crate::messages::{DriveTelemetry, JoystickSample, RuntimeHealth};
use crate::motor::MotorDriver;
use crate::motor::mixing::{self, DrivePair, MotorCommand};

/// Startup options resolved from the command line
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub joystick_port: String,
    pub motor_port: String,
    /// When false, decode and publish only; never open the motor controller
    pub motors_enabled: bool,
}

pub struct Runtime {
    latest: Option<JoystickSample>,
    sample_received_at: Instant,
    last_drive: DrivePair,
    last_speeds: (i32, i32),
    health: RuntimeHealth,
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            latest: None,
            sample_received_at: Instant::now(),
            last_drive: DrivePair::stop(),
            last_speeds: (0, 0),
            health: RuntimeHealth::LinkStale, // Stale until the first frame
        }
    }

    /// Record a newly published sample. A corrupt frame still counts as
    /// link activity for the watchdog.
    fn on_sample(&mut self, sample: JoystickSample) {
        self.latest = Some(sample);
        self.sample_received_at = Instant::now();
    }

    /// Compute this cycle's drive, including watchdog and hold-last logic
    fn compute_drive(&mut self) -> DrivePair {
        let sample_age = self.sample_received_at.elapsed();

        if sample_age > LINK_TIMEOUT {
            // Watchdog triggered - stop the base. The held command is
            // zeroed too, so a later corrupt frame cannot bring back a
            // pre-outage command.
            if self.health != RuntimeHealth::LinkStale {
                warn!("Joystick link stale ({:?} old), stopping motors", sample_age);
            }
            self.health = RuntimeHealth::LinkStale;
            self.last_drive = DrivePair::stop();
            self.last_speeds = (0, 0);
            return DrivePair::stop();
        }

        match self.latest {
            Some(sample) if sample.valid => {
                self.health = RuntimeHealth::Ok;
                let (speed_a, speed_b) = mixing::mix(sample.x, sample.y);
                debug!(
                    "X: {} / Y: {} -- A: {} / B: {}",
                    sample.x, sample.y, speed_a, speed_b
                );
                self.last_speeds = (speed_a, speed_b);
                self.last_drive = DrivePair {
                    a: MotorCommand::from_speed(speed_a),
                    b: MotorCommand::from_speed(speed_b),
                };
                self.last_drive
            }
            Some(_) => {
                // Checksum failure on the latest frame: hold the previous
                // command until the link recovers or the watchdog fires
                self.health = RuntimeHealth::BadFrame;
                self.last_drive
            }
            None => {
                // No frame ever received
                self.health = RuntimeHealth::LinkStale;
                DrivePair::stop()
            }
        }
    }

    fn telemetry(&self) -> DriveTelemetry {
        let sample = self.latest.unwrap_or_default();
        DriveTelemetry {
            x: sample.x,
            y: sample.y,
            speed_a: self.last_speeds.0,
            speed_b: self.last_speeds.1,
        }
    }
}

pub async fn run(opts: RunOptions) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers...");
    let pub_drive = session.declare_publisher(TOPIC_DRIVE).await?;
    let pub_health = session.declare_publisher(TOPIC_HEALTH).await?;

    info!("Opening joystick link on {}...", opts.joystick_port);
    let source = SerialSource::open(&opts.joystick_port, JOYSTICK_BAUDRATE)?;
    let (sample_tx, mut sample_rx) = watch::channel(JoystickSample::default());
    link::spawn_reader(source, sample_tx)?;

    let mut driver = if opts.motors_enabled {
        Some(MotorDriver::open(&opts.motor_port)?)
    } else {
        info!("Motor output disabled, decoding and publishing only");
        None
    };

    let mut runtime = Runtime::new();
    let mut tick = interval(Duration::from_millis(1000 / LOOP_HZ));

    info!(
        "Runtime started: {}Hz loop, {}ms link watchdog",
        LOOP_HZ,
        LINK_TIMEOUT.as_millis()
    );
    info!("Publishing to: {}, {}", TOPIC_DRIVE, TOPIC_HEALTH);

    loop {
        tick.tick().await;

        // 1. Pick up the newest sample, if the reader published one
        if sample_rx.has_changed()? {
            let sample = *sample_rx.borrow_and_update();
            runtime.on_sample(sample);
        }

        // 2. Compute drive (includes watchdog and hold-last logic)
        let drive = runtime.compute_drive();

        // 3. Drive the motors; a failed write skips the cycle, not the loop
        if let Some(driver) = driver.as_mut() {
            if let Err(e) = driver.apply(drive) {
                warn!("Motor write failed: {}", e);
            }
        }

        // 4. Publish telemetry and health
        let telemetry_json = serde_json::to_string(&runtime.telemetry())?;
        pub_drive.put(telemetry_json).await?;

        let health_json = serde_json::to_string(&runtime.health)?;
        pub_health.put(health_json).await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::mixing::Direction;

    fn valid(x: u8, y: u8) -> JoystickSample {
        JoystickSample { x, y, valid: true }
    }

    fn corrupt(x: u8, y: u8) -> JoystickSample {
        JoystickSample { x, y, valid: false }
    }

    #[test]
    fn test_no_sample_yet_stays_stopped() {
        let mut runtime = Runtime::new();
        assert_eq!(runtime.compute_drive(), DrivePair::stop());
        assert_eq!(runtime.health, RuntimeHealth::LinkStale);
    }

    #[test]
    fn test_centered_stick_is_zero_duty_forward() {
        let mut runtime = Runtime::new();
        runtime.on_sample(valid(128, 128));

        let drive = runtime.compute_drive();
        assert_eq!(runtime.health, RuntimeHealth::Ok);
        assert_eq!(drive.a.duty, 0);
        assert_eq!(drive.a.direction, Direction::Forward);
        assert_eq!(drive.b.duty, 0);
        assert_eq!(drive.b.direction, Direction::Forward);
    }

    #[test]
    fn test_corrupt_frame_holds_last_drive() {
        let mut runtime = Runtime::new();
        runtime.on_sample(valid(200, 100));
        let held = runtime.compute_drive();
        assert_ne!(held, DrivePair::stop());

        runtime.on_sample(corrupt(200, 100));
        assert_eq!(runtime.compute_drive(), held);
        assert_eq!(runtime.health, RuntimeHealth::BadFrame);
    }

    #[test]
    fn test_watchdog_stops_after_silence() {
        let mut runtime = Runtime::new();
        runtime.on_sample(valid(255, 255));
        assert_ne!(runtime.compute_drive(), DrivePair::stop());

        runtime.sample_received_at = Instant::now() - LINK_TIMEOUT * 2;
        assert_eq!(runtime.compute_drive(), DrivePair::stop());
        assert_eq!(runtime.health, RuntimeHealth::LinkStale);
    }

    #[test]
    fn test_corrupt_frame_after_watchdog_stays_stopped() {
        let mut runtime = Runtime::new();
        runtime.on_sample(valid(255, 255));
        runtime.compute_drive();

        runtime.sample_received_at = Instant::now() - LINK_TIMEOUT * 2;
        runtime.compute_drive();

        // A corrupt frame revives the link but must not revive the old
        // command
        runtime.on_sample(corrupt(255, 255));
        assert_eq!(runtime.compute_drive(), DrivePair::stop());
        assert_eq!(runtime.health, RuntimeHealth::BadFrame);
    }

    #[test]
    fn test_bytes_to_drive_end_to_end() {
        use crate::link::frame::{FrameDecoder, FrameEvent};

        // 200 + 100 = 300, wraps to checksum 44
        let bytes = [0x00, 0xFF, 200, 100, 0, 0, 0, 0, 44];
        let mut decoder = FrameDecoder::new();
        let mut event = None;
        for byte in bytes {
            if let Some(e) = decoder.push(byte) {
                event = Some(e);
            }
        }
        let Some(FrameEvent::Frame { x, y }) = event else {
            panic!("expected a decoded frame, got {:?}", event);
        };

        let mut runtime = Runtime::new();
        runtime.on_sample(valid(x, y));
        let drive = runtime.compute_drive();

        // y=100 gives forward -33, x=200 gives turn 54
        assert_eq!(
            drive.a,
            MotorCommand {
                direction: Direction::Reverse,
                duty: 87
            }
        );
        assert_eq!(
            drive.b,
            MotorCommand {
                direction: Direction::Forward,
                duty: 21
            }
        );
    }
}
