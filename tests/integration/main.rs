//! Integration tests: the full config -> sources -> poller -> API path.

mod mock_source;
mod pipeline;
