pub mod api;
pub mod converter;

pub use api::OneCallResponse;
pub use converter::{convert_onecall, parse_onecall};
