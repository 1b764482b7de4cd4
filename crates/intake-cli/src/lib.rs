//! Library side of the `intake` binary, shared with integration tests.

pub mod logging;
pub mod pipeline;
pub mod types;
