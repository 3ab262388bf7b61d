//! Adapters - Implementations of ports against concrete infrastructure.

pub mod ai;
pub mod postgres;
