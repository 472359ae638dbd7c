//! Session runtime for the ndformal natural-deduction engine.
//!
//! The crate wraps an [`ndformal::engine::Engine`] in a [`session::Session`] that tracks
//! exercises, the proof being written, single-step undo and shortest-proof records. Progress
//! survives across sessions through an optional [`store::KeyValueStore`]; most consumers will
//! build a session from a [`config::SessionConfig`] with [`session::Session::open`].

pub mod config;
pub mod error;
pub mod exercise;
pub mod magic;
pub mod proof;
pub mod session;
pub mod store;
pub mod workspace;

pub extern crate ndformal;
