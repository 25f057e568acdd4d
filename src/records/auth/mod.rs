use serde::{Deserialize, Serialize};

use crate::UserRecord;

pub mod auth_methods;
pub mod auth_refresh;
pub mod auth_with_oauth2;
pub mod auth_with_password;
pub mod email_change;
pub mod external_auths;
pub mod password_reset;
pub mod verification;

/// Result of a successful authentication.
///
/// The client never keeps it: pass `token` to the calls that need it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthSession {
    /// The session token, to be sent as `Authorization: Bearer <token>`.
    pub token: String,
    /// The authenticated user's record.
    pub record: UserRecord,
}

/// OAuth2 handshake parameters for one provider.
///
/// Valid for a single login attempt only: keep `state` and `code_verifier`
/// until the provider redirects back, then pass them to
/// [`crate::Collection::auth_with_oauth2`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthProvider {
    /// Provider name (`google`, `github`, ...).
    #[serde(default)]
    pub name: String,
    /// Anti-CSRF state to compare with the one in the redirect.
    pub state: String,
    /// PKCE code verifier.
    pub code_verifier: String,
    /// PKCE code challenge.
    pub code_challenge: String,
    /// PKCE challenge method (usually `S256`).
    pub code_challenge_method: String,
    /// Provider authorization URL, to be completed with the redirect URL.
    pub auth_url: String,
}

/// An external (OAuth2) identity linked to a user record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccount {
    /// ID of the link itself.
    #[serde(default)]
    pub id: String,
    /// The timestamp when the link was created.
    pub created: String,
    /// The timestamp when the link was last updated.
    pub updated: String,
    /// ID of the linked user record.
    pub record_id: String,
    /// ID of the collection of the linked user record.
    pub collection_id: String,
    /// Provider name.
    pub provider: String,
    /// The user's ID at the provider.
    pub provider_id: String,
}
