pub mod block;
pub mod cabac;
pub mod codec;
pub mod config;
pub mod container;
pub mod transform;

#[doc(hidden)]
pub mod _internal_test_data;
mod bit_stream;
mod stream_handler;
