//! Various errors module.

use core::fmt;
use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

/// This error represents the body returned by the `PocketBase`
/// instance alongside a 4xx status.
#[derive(Deserialize, Debug, Default)]
pub struct BadRequestResponse {
    /// Description from given by `PocketBase` about why the error happened.
    #[serde(default)]
    pub message: String,
    /// A list of fields that caused the error.
    #[serde(default)]
    pub data: HashMap<String, BadRequestField>,
}

/// Represents an instance of one of the errors that could be returned on a bad request.
///
/// This struct holds detailed information about a single validation error,
/// including the field name, error code, and a user-friendly message.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BadRequestError {
    /// Name of the field.
    pub name: String,
    /// Error code.
    pub code: String,
    /// More details about the error.
    pub message: String,
}

impl fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.name, self.code, self.message)
    }
}

/// Represents one of the fields that caused the Bad Request error.
#[derive(Deserialize, Debug)]
pub struct BadRequestField {
    /// Error code *(example: `validation_required`)*.
    #[serde(default)]
    pub code: String,
    /// A text explaining in a readable way what this error is.
    #[serde(default)]
    pub message: String,
}

/// Represents errors when interacting with the `PocketBase` API.
///
/// Every client method maps the HTTP status of the response onto one of these
/// variants. Nothing is retried internally.
#[derive(Error, Debug)]
pub enum RequestError {
    /// Communication with the `PocketBase` API was successful,
    /// but returned a [400 Bad Request]("https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/400") HTTP error response.
    ///
    /// The filter, query parameters or payload were rejected. `errors` lists
    /// the offending fields when the server reported any.
    #[error("Invalid Filter: The request was rejected by PocketBase. {message}")]
    InvalidFilter {
        /// Message returned by the server.
        message: String,
        /// Per-field validation failures.
        errors: Vec<BadRequestError>,
    },
    /// Communication with the `PocketBase` API was successful,
    /// but returned a [401 Unauthorized]("https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/401") HTTP error response.
    ///
    /// The given token is missing, invalid or expired.
    #[error("Authentication Failed: The auth token is missing, invalid or expired.")]
    AuthenticationFailed,
    /// Communication with the `PocketBase` API was successful,
    /// but returned a [403 Forbidden]("https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/403") HTTP error response.
    ///
    /// The authenticated user may not have permissions for this interaction.
    #[error("Forbidden: The authenticated user may not have permissions for this interaction.")]
    Forbidden,
    /// Communication with the `PocketBase` API was successful,
    /// but returned a [404 Not Found]("https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/404") HTTP error response.
    #[error("Not Found: {0}")]
    NotFound(String),
    /// Communication with the `PocketBase` API was successful,
    /// but returned a [500 Internal Server Error]("https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/500") HTTP error response.
    #[error("Server Error: PocketBase failed to process the request.")]
    Server,
    /// The response carried a status code this crate doesn't map to a dedicated variant.
    #[error("Unexpected Status: An unhandled status code was returned by the PocketBase API: {0}")]
    UnexpectedStatus(reqwest::StatusCode),
    /// Communication with the `PocketBase` API failed.
    ///
    /// This could be caused by an internet outage, a DNS failure, a timeout,
    /// an error in the base URL given to the client and similar errors.
    #[error("Transport Error: The communication with the PocketBase API failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response could not be parsed into the expected data structure.
    #[error(
        "Decode Error: Could not parse response into the expected data structure. It usually means that there is a mismatch between the provided type and your Collection definition. - {0}"
    )]
    Decode(#[source] serde_json::Error),
}

impl RequestError {
    /// Builds the error matching a non-success response, consuming its body.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();

        match status {
            reqwest::StatusCode::BAD_REQUEST => {
                let body = response.bytes().await.unwrap_or_default();
                let bad_response =
                    serde_json::from_slice::<BadRequestResponse>(&body).unwrap_or_default();

                let mut errors: Vec<BadRequestError> = bad_response
                    .data
                    .into_iter()
                    .map(|(name, field)| BadRequestError {
                        name,
                        code: field.code,
                        message: field.message,
                    })
                    .collect();
                errors.sort_by(|a, b| a.name.cmp(&b.name));

                Self::InvalidFilter {
                    message: bad_response.message,
                    errors,
                }
            }

            reqwest::StatusCode::UNAUTHORIZED => Self::AuthenticationFailed,
            reqwest::StatusCode::FORBIDDEN => Self::Forbidden,

            reqwest::StatusCode::NOT_FOUND => {
                let body = response.bytes().await.unwrap_or_default();
                let message = serde_json::from_slice::<BadRequestResponse>(&body)
                    .ok()
                    .map(|not_found| not_found.message)
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| "The requested resource wasn't found.".to_string());

                Self::NotFound(message)
            }

            reqwest::StatusCode::INTERNAL_SERVER_ERROR => Self::Server,

            _ => Self::UnexpectedStatus(status),
        }
    }
}

/// Represents errors raised while building a [`crate::PocketBase`] client.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The base URL couldn't be parsed, or doesn't use the `http`/`https` scheme.
    #[error("Invalid base_url: {0}. It must be an absolute http:// or https:// URL.")]
    InvalidBaseUrl(String),
    /// The underlying HTTP client couldn't be created.
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),
    /// The collection name is empty or contains characters other than
    /// alphanumerics and underscores.
    #[error("Invalid collection name: {0:?}. Only alphanumeric characters and underscores are allowed.")]
    InvalidCollectionName(String),
}
