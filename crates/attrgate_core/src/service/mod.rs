//! Use-case services built on the attribute policy.

pub mod search_gate;
