//! Program loading and host integration.
//!
//! Provides the container loader and writer, the pin tables and named
//! variables a container carries, the host I/O hook trait, and the
//! [`Simulator`](simulator::Simulator) harness that runs cycles with those
//! hooks around them.

/// Container writer.
pub mod container;

/// Loaded images and named-variable tables.
pub mod image;

/// Input, output and analog pin tables.
pub mod io_map;

/// Container parser.
pub mod loader;

/// Host harness combining interpreter, metadata and I/O hooks.
pub mod simulator;

/// Host I/O hook trait and the stub driver.
pub mod traits;

pub use image::{Image, Symbols};
pub use io_map::{IoMap, PinKind};
pub use traits::{IoDriver, NullIo};
