use serde::Serialize;

use crate::error::RequestError;
use crate::{AuthSession, Collection, PocketBase};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OAuth2Credentials<'a> {
    provider: &'a str,
    auth_code: &'a str,
    verifier: &'a str,
    redirect_url: &'a str,
}

impl Collection<'_> {
    /// Authenticate with an OAuth2 provider, creating the user and the link on
    /// first login.
    ///
    /// `verifier` is the [`crate::AuthProvider::code_verifier`] obtained from
    /// [`Collection::list_auth_methods`] before redirecting the user, and
    /// `redirect_url` must be the one used for that redirect. A response
    /// without `token` fails with [`RequestError::Decode`].
    ///
    /// # Example
    /// ```rust,ignore
    /// let session = pb
    ///     .users()
    ///     .auth_with_oauth2("github", "CODE_FROM_REDIRECT", &provider.code_verifier, "https://app.example.com/redirect")
    ///     .await?;
    /// ```
    pub async fn auth_with_oauth2(
        &self,
        provider: &str,
        auth_code: &str,
        verifier: &str,
        redirect_url: &str,
    ) -> Result<AuthSession, RequestError> {
        let url = self.endpoint("auth-with-oauth2");

        let credentials = OAuth2Credentials {
            provider,
            auth_code,
            verifier,
            redirect_url,
        };

        let request = self.client.request_post_json(&url, &credentials, None);

        PocketBase::execute_json::<AuthSession>(request).await
    }
}
