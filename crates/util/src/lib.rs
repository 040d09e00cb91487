pub mod config;
pub mod http;
pub mod odata_encoding;
pub mod path_processing;
pub mod redaction;
pub mod validation;

pub use config::*;
pub use http::*;
pub use odata_encoding::*;
pub use path_processing::*;
pub use redaction::*;
pub use validation::*;
