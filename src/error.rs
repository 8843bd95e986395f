/// Errors that can occur while loading districts from the spreadsheet.
///
/// None of these reach the user: the adapter boundary logs them and falls
/// back to mock data.
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    /// HTTP request failed, or its body was not the JSON we expected.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service-account assertion could not be signed.
    #[error("service account signing failed: {0}")]
    Auth(#[from] jsonwebtoken::errors::Error),

    /// Endpoint URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The API answered with a non-success status.
    #[error("Sheets API returned {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, for the log line.
        body: String,
    },

    /// A tab had rows but no header row to key them by.
    #[error("sheet \"{0}\" has no header row")]
    Header(String),
}
