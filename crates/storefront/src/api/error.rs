use deploy::validation::IssueReport;
use shared::models::automation::FieldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode provider response: {0}")]
    Decode(String),

    /// `success: false` from the provider, message kept verbatim.
    #[error("{0}")]
    Provider(String),

    #[error("Deploy request rejected:\n{0}")]
    Rejected(IssueReport),

    #[error("Invalid automation: {}", format_field_errors(.0))]
    InvalidForm(Vec<FieldError>),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
