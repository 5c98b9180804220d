// Joystick-driven differential-drive runtime
//
// Decodes framed joystick samples from a wireless serial link and drives a
// two-channel motor controller with arcade-mixed commands.

pub mod config;
pub mod link;
pub mod messages;
pub mod motor;
pub mod runtime;
