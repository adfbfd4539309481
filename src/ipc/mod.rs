//! IPC listener that accepts input events over a Unix socket.
//!
//! Input drivers and scripts connect to the socket and send
//! newline-delimited JSON [`InputEvent`](crate::event::InputEvent)s.

pub mod listener;
