//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod wheel;

pub use wheel::{WheelOptions, WheelOutput, WheelService, STDIN_PATH};
