//! Conversion logic for qnatsv.
//!
//! This crate flattens a knowledge-base export into TSV rows, writes the
//! output file set, and ties both together in [`pipeline::convert`].

pub mod emit;
pub mod flatten;
pub mod pipeline;
