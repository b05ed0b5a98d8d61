//! Shared pixel-board client runtime.
//!
//! The board engine lives in the `canvas` crate and the wire codec in
//! `frames`; this crate wires them to the network and the user.
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Session state machine, the single owner of board state |
//! | [`events`] | Event queue every producer posts into |
//! | [`connection`] | Live websocket and simulated transports |
//! | [`login`] | HTTP and simulated login |
//! | [`config`] | `PIXELBOARD_*` environment configuration |
//! | [`surface`] | Outbound UI calls and a logging implementation |
//! | [`command`] | Line commands for the headless binary |

pub mod command;
pub mod config;
pub mod connection;
pub mod events;
pub mod login;
pub mod session;
pub mod surface;
