//! Configuration management
//!
//! Static configuration is loaded once at startup from `config.toml` with an
//! environment-variable overlay, then handed to each service by value. There
//! is no global config singleton: services own the sections they need, which
//! keeps them testable in isolation and allows multiple independent
//! instances in tests.

mod structs;

pub use structs::*;
