//! Domain types and the ports the application layer talks through.

pub mod message;
pub mod ports;
pub mod question;
pub mod usage;
