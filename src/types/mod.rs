//! Request and response bodies of the HTTP API and the CLI

pub mod request;
pub mod response;

pub use request::UiErrorRequest;
pub use response::{
    AccountErrorResponse, ClassifyOutcome, ClassifyReport, ErrorLogResponse, ErrorResponse,
    PingResponse,
};
