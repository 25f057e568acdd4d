use crate::error::RequestError;
use crate::{AuthSession, Collection, PocketBase};

impl Collection<'_> {
    /// Returns a new auth session (token and record data) for an **already authenticated record**.
    ///
    /// Usually called on page/screen reload to make sure a stored token is still valid
    /// and to extend it.
    ///
    /// - 401: [`RequestError::AuthenticationFailed`], the token is invalid or expired.
    /// - 404: [`RequestError::NotFound`] with `missing auth record context`.
    ///
    /// # Example
    /// ```rust,ignore
    /// let session = pb.users()
    ///     .auth_refresh(&stored_token)
    ///     .await?;
    ///
    /// println!("New token: {}", session.token);
    /// ```
    pub async fn auth_refresh(&self, token: &str) -> Result<AuthSession, RequestError> {
        let url = self.endpoint("auth-refresh");

        let request = self.client.request_post(&url, Some(token));

        PocketBase::execute_json::<AuthSession>(request)
            .await
            .map_err(|error| match error {
                RequestError::NotFound(_) => {
                    RequestError::NotFound("missing auth record context".to_string())
                }
                error => error,
            })
    }
}
