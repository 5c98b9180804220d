// High-level driver for the two-motor base
//
// Combines mixing output and the Sabertooth protocol to provide a simple
// API for driving both channels.

use tracing::{info, warn};

use super::mixing::{DrivePair, MotorCommand};
use super::sabertooth::{Motor, Result, SabertoothBus};

/// High-level two-channel motor driver
pub struct MotorDriver {
    bus: SabertoothBus,
}

impl MotorDriver {
    /// Open the controller on the given serial port and lock in its baud
    /// rate.
    pub fn open(port: &str) -> Result<Self> {
        info!("Opening motor controller on {}", port);
        let mut bus = SabertoothBus::open(port)?;
        bus.initialize()?;
        Ok(Self { bus })
    }

    /// Apply one control cycle's commands to both channels
    pub fn apply(&mut self, drive: DrivePair) -> Result<()> {
        self.set_motor(Motor::A, drive.a)?;
        self.set_motor(Motor::B, drive.b)
    }

    /// Drive a single channel
    pub fn set_motor(&mut self, motor: Motor, command: MotorCommand) -> Result<()> {
        self.bus.drive(motor, command.direction, command.duty)
    }

    /// Stop both motors immediately
    pub fn stop(&mut self) -> Result<()> {
        info!("Stopping both motors");
        self.apply(DrivePair::stop())
    }
}

impl Drop for MotorDriver {
    fn drop(&mut self) {
        // Try to stop motors when driver is dropped (safety measure)
        if let Err(e) = self.stop() {
            warn!("Failed to stop motors on drop: {}", e);
        }
    }
}
