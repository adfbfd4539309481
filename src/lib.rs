//! **snapgrab**: interactive move and resize for a compositor.
//!
//! A user grabs a view with a modifier+button binding (or a client asks to
//! be moved), drags it around, and releases it.  While dragging, the view
//! may be snapped to one of nine screen-edge zones, a translucent preview
//! shows where it would land, and mirrors keep it visible on every output
//! it overlaps.  Crossing onto another output hands the drag to that
//! output's controller.
//!
//! # Architecture
//!
//! * [`grab::GrabController`]: the per-output state machine.
//! * [`signals::Dispatcher`]: owns one controller per output, routes
//!   input, and delivers [`signals::Signal`]s in FIFO order.
//! * [`snap`], [`preview`], [`mirror`]: snap zone detection and the
//!   ephemeral visuals, animated by [`animation`] on frame ticks.
//! * [`traits`]: the seams to the compositor core, the layout engine,
//!   the animation effect and the input transport.
//!
//! [`headless`] implements the compositor seams in memory, and [`ipc`]
//! feeds it input events over a Unix socket.

pub mod animation;
pub mod config;
pub mod event;
pub mod geometry;
pub mod grab;
pub mod headless;
pub mod ipc;
pub mod mirror;
pub mod preview;
pub mod signals;
pub mod snap;
pub mod traits;
