//! chatpoll library
//!
//! Poll authoring, voting and tallying for a messaging app, usable in-process
//! through [`polls`] or hosted behind the HTTP API in [`server`].

pub mod cli;
pub mod config;
pub mod logging;
pub mod polls;
pub mod server;
