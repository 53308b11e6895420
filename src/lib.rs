//! A single producer appends a fixed list of items to a shared, append-only
//! buffer; consumers watch the buffer grow and report the newest item until
//! the producer raises its done flag.

pub mod buffer;
pub mod cli;
pub mod coordinator;
pub mod worker;
