use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page database query returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("page object missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid timestamp in `{field}`: {value}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("unexpected response payload: {0}")]
    UnexpectedPayload(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
