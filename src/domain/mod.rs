//! Domain types and the ports the application layer drives.

pub mod address;
pub mod amount;
pub mod log;
pub mod ports;
pub mod recipient;
pub mod token;
