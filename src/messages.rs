// Message types shared by the link reader and the control loop

use serde::{Deserialize, Serialize};

/// Latest decoded joystick state. Written by the link reader, read by the
/// control loop; always replaced as a whole so readers never see axes and
/// validity from different frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JoystickSample {
    pub x: u8,
    pub y: u8,
    /// True only when the most recent complete frame passed its checksum
    pub valid: bool,
}

/// Per-cycle telemetry published by the runtime
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DriveTelemetry {
    pub x: u8,
    pub y: u8,
    pub speed_a: i32,
    pub speed_b: i32,
}

/// Health status published by the runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    /// Latest frame failed its checksum; the previous command is held
    BadFrame,
    /// No frame within the watchdog window; motors stopped
    LinkStale,
}
