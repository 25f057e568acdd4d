use serde::Serialize;

use crate::error::RequestError;
use crate::{AuthSession, Collection, PocketBase};

#[derive(Serialize)]
struct Credentials<'a> {
    identity: &'a str,
    password: &'a str,
}

impl Collection<'_> {
    /// Authenticate with combination of **email**/**username** and **password**.
    ///
    /// Wrong credentials come back as a 400, i.e.
    /// [`RequestError::InvalidFilter`] with the server's message.
    ///
    /// # Example
    /// ```rust,ignore
    /// let session = pb
    ///     .users()
    ///     .auth_with_password("YOUR_EMAIL_OR_USERNAME", "YOUR_PASSWORD")
    ///     .await?;
    ///
    /// println!("Token: {}", session.token);
    /// ```
    pub async fn auth_with_password(
        &self,
        identity: &str,
        password: &str,
    ) -> Result<AuthSession, RequestError> {
        let url = self.endpoint("auth-with-password");

        let credentials = Credentials { identity, password };

        let request = self.client.request_post_json(&url, &credentials, None);

        PocketBase::execute_json::<AuthSession>(request).await
    }
}
