use std::collections::HashMap;

use crate::error::RequestError;
use crate::{Collection, PocketBase};

impl Collection<'_> {
    /// Sends users account verification request.
    ///
    /// The email contains a token to pass to [`Collection::confirm_verification`].
    ///
    /// # Example
    /// ```rust,ignore
    /// pb.users()
    ///     .request_verification("test@example.com")
    ///     .await?;
    /// ```
    pub async fn request_verification(&self, email: &str) -> Result<(), RequestError> {
        let url = self.endpoint("request-verification");

        let body: HashMap<&str, &str> = HashMap::from([("email", email)]);

        let request = self.client.request_post_json(&url, &body, None);

        PocketBase::execute_empty(request).await
    }

    /// Confirms a user account verification with the token received by email.
    ///
    /// # Example
    /// ```rust,ignore
    /// pb.users()
    ///     .confirm_verification("VERIFICATION_TOKEN")
    ///     .await?;
    /// ```
    pub async fn confirm_verification(&self, verification_token: &str) -> Result<(), RequestError> {
        let url = self.endpoint("confirm-verification");

        let body: HashMap<&str, &str> = HashMap::from([("token", verification_token)]);

        let request = self.client.request_post_json(&url, &body, None);

        PocketBase::execute_empty(request).await
    }
}
