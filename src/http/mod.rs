//! HTTP transport, response decoding, and error body extraction.

mod extract;
mod response;
mod transport;

pub use extract::{
    INVALID_TOKEN, NormalizedError, ValidationError, classify, collect_errors, error_code,
};
pub use response::ApiResponse;
pub use transport::{Method, RawResponse, ReqwestTransport, Transport, TransportRequest};

#[cfg(test)]
pub use transport::MockTransport;
