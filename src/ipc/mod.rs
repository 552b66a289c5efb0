//! IPC listener that accepts commands over a Unix socket.
//!
//! The host OS shim (the process owning windows and input monitors)
//! connects to the socket, sends newline-delimited JSON commands and reads
//! one JSON response line per command.

pub mod listener;
