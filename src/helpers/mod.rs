pub mod format;
pub mod validate;

pub use format::{format_bytes_as, format_scaled};
pub use validate::{
    REDACTED_PASSWORD, extract_host_from_uri, redact_uri_password, validate_mongodb_uri,
};
