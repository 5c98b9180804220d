// Motor control module for the differential-drive base
//
// Provides:
// - Arcade mixing (joystick axes -> per-motor drive commands)
// - Sabertooth packetized-serial protocol implementation
// - High-level two-motor driver API

mod driver;
pub mod mixing;
pub mod sabertooth;

pub use driver::MotorDriver;
pub use mixing::{Direction, DrivePair, MotorCommand, mix};
pub use sabertooth::{Motor, SabertoothBus, SabertoothError};
