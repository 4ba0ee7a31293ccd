//! Adapters that read data from outside the process.

pub mod csv;
