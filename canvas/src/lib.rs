//! Board state and drawing engine for the shared pixel board.
//!
//! This crate performs no I/O. It owns the canonical cell grid, reconciles it
//! against server snapshots and point deltas, and turns raw pointer gestures
//! into stroke batches. The host runtime feeds events in and acts on the
//! returned [`engine::Action`]s: rendering cells and sending strokes.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::EngineCore`] and the actions it emits |
//! | [`board`] | Board matrix ownership and snapshot/delta reconciliation |
//! | [`coords`] | Row/column vs x/y normalization and clamping |
//! | [`input`] | Tools and the stroke gesture state machine |
//! | [`consts`] | Shared numeric constants (pen radius limits, board defaults) |

pub mod board;
pub mod consts;
pub mod coords;
pub mod engine;
pub mod input;
