//! Library side of the `incident-master` binary: command runners, request
//! types and logging setup.

#![deny(unsafe_code)]

pub mod commands;
pub mod logging;
pub mod types;
