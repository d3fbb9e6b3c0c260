//! Cross-crate integration tests against the public API.

mod daemons;
mod probes;
