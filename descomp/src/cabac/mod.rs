//! Context-adaptive binary arithmetic coding.
//!
//! [`writer::Writer`] and [`reader::Reader`] combine the binarization layer
//! with an M-coder style binary arithmetic coder. Probability-state tables
//! and the coder's initialization are a fixed wire-compatibility contract;
//! see `tables`.

pub mod binarization;
pub mod reader;
pub mod writer;

mod context_model;
mod context_selector;
mod decoder;
mod encoder;
mod tables;
