//! Command-line host for a voice diagnostic session.
//!
//! Reads session events as JSON lines on stdin and writes session updates
//! as JSON lines on stdout. Logs go to stderr.

pub mod config;
pub mod stdio;
