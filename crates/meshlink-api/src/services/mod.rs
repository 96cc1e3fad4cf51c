//! Request-level workflows shared by several handlers.

pub mod pipeline;
