// Sabertooth packetized-serial protocol implementation
//
// Packet format: [Address, Command, Data, Checksum]
// Checksum = (Address + Command + Data) & 0x7F
// The controller is write-only: it never replies.

use std::io::Write;
use std::time::Duration;

use serialport::{self, SerialPort};
use tracing::debug;

use super::mixing::{Direction, MAX_DUTY};

/// Default serial configuration for the Sabertooth controller
pub const DEFAULT_BAUDRATE: u32 = 9_600;
pub const DEFAULT_ADDRESS: u8 = 128;

/// Sent once after power-up so the controller locks in the baud rate
const BAUDING_BYTE: u8 = 0xAA;

/// Drive commands
#[repr(u8)]
#[derive(Debug, Clone, Copy)]
enum Command {
    Motor1Forward = 0x00,
    Motor1Reverse = 0x01,
    Motor2Forward = 0x04,
    Motor2Reverse = 0x05,
}

/// Motor channel selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motor {
    A,
    B,
}

/// Error types for Sabertooth communication
#[derive(Debug, thiserror::Error)]
pub enum SabertoothError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duty {duty} out of range (0..=99)")]
    DutyOutOfRange { duty: u8 },

    #[error("Invalid controller address {address} (valid: 128..=135)")]
    InvalidAddress { address: u8 },
}

pub type Result<T> = std::result::Result<T, SabertoothError>;

/// Sabertooth motor controller bus
pub struct SabertoothBus {
    port: Box<dyn SerialPort>,
    address: u8,
}

impl SabertoothBus {
    /// Open a connection to the controller at the default address
    pub fn open(port_name: &str) -> Result<Self> {
        Self::open_with_address(port_name, DEFAULT_ADDRESS)
    }

    /// Open with a custom controller address (DIP-switch selected)
    pub fn open_with_address(port_name: &str, address: u8) -> Result<Self> {
        if !(128..=135).contains(&address) {
            return Err(SabertoothError::InvalidAddress { address });
        }

        let port = serialport::new(port_name, DEFAULT_BAUDRATE)
            .timeout(Duration::from_millis(100))
            .open()?;

        Ok(Self { port, address })
    }

    /// Send the bauding byte. The controller ignores drive packets until it
    /// has seen one after power-up.
    pub fn initialize(&mut self) -> Result<()> {
        self.port.write_all(&[BAUDING_BYTE])?;
        self.port.flush()?;
        Ok(())
    }

    /// 7-bit checksum over address, command and data
    fn checksum(address: u8, command: u8, data: u8) -> u8 {
        address.wrapping_add(command).wrapping_add(data) & 0x7F
    }

    fn build_packet(address: u8, command: Command, data: u8) -> [u8; 4] {
        [
            address,
            command as u8,
            data,
            Self::checksum(address, command as u8, data),
        ]
    }

    /// Drive one channel: direction selects the command, the duty rides in
    /// the data byte.
    pub fn drive(&mut self, motor: Motor, direction: Direction, duty: u8) -> Result<()> {
        if duty > MAX_DUTY {
            return Err(SabertoothError::DutyOutOfRange { duty });
        }

        let command = match (motor, direction) {
            (Motor::A, Direction::Forward) => Command::Motor1Forward,
            (Motor::A, Direction::Reverse) => Command::Motor1Reverse,
            (Motor::B, Direction::Forward) => Command::Motor2Forward,
            (Motor::B, Direction::Reverse) => Command::Motor2Reverse,
        };

        let packet = Self::build_packet(self.address, command, duty);
        debug!("Drive {:?}: {:?} duty={}", motor, direction, duty);
        self.port.write_all(&packet)?;
        self.port.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum() {
        // 128 + 0 + 64 = 192, masked to 7 bits
        assert_eq!(SabertoothBus::checksum(128, 0, 64), 64);
        assert_eq!(SabertoothBus::checksum(128, 1, 99), 100);
        // 135 + 5 + 127 wraps past 255; masking matches the wider sum
        assert_eq!(SabertoothBus::checksum(135, 5, 127), 11);
    }

    #[test]
    fn test_build_packet() {
        let packet = SabertoothBus::build_packet(128, Command::Motor1Forward, 64);
        assert_eq!(packet, [128, 0x00, 64, 64]);

        let packet = SabertoothBus::build_packet(128, Command::Motor2Reverse, 99);
        assert_eq!(packet, [128, 0x05, 99, 104]);
    }
}
