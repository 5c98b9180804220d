// Timeouts, topics, serial configuration
use std::time::Duration;

// Control loop frequency
pub const LOOP_HZ: u64 = 50;

// Link watchdog: stop the base when no frame has arrived for this long
pub const LINK_TIMEOUT: Duration = Duration::from_millis(250);

// Zenoh topics
pub const TOPIC_DRIVE: &str = "rover/rt/drive"; // per-cycle telemetry
pub const TOPIC_HEALTH: &str = "rover/state/health"; // health status

// Wireless joystick receiver (RF serial link, 9600 8-N-1)
pub const JOYSTICK_PORT: &str = "/dev/ttyUSB0";
pub const JOYSTICK_BAUDRATE: u32 = 9_600;

// Two-channel motor controller
pub const MOTOR_PORT: &str = "/dev/ttyUSB1";
