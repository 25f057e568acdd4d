use std::collections::HashMap;

use serde::Serialize;

use crate::error::RequestError;
use crate::{Collection, PocketBase};

#[derive(Serialize)]
struct EmailChangeConfirmation<'a> {
    token: &'a str,
    password: &'a str,
}

impl Collection<'_> {
    /// Asks for the authenticated user's email to be changed to `new_email`.
    ///
    /// A confirmation token is sent to the new address. Fails with
    /// [`RequestError::AuthenticationFailed`] when `token` is rejected.
    ///
    /// # Example
    /// ```rust,ignore
    /// pb.users()
    ///     .request_email_change(&session.token, "new@example.com")
    ///     .await?;
    /// ```
    pub async fn request_email_change(
        &self,
        token: &str,
        new_email: &str,
    ) -> Result<(), RequestError> {
        let url = self.endpoint("request-email-change");

        let body: HashMap<&str, &str> = HashMap::from([("newEmail", new_email)]);

        let request = self.client.request_post_json(&url, &body, Some(token));

        PocketBase::execute_empty(request).await
    }

    /// Confirms an email change with the token received at the new address
    /// and the user's current password.
    ///
    /// # Example
    /// ```rust,ignore
    /// pb.users()
    ///     .confirm_email_change("EMAIL_CHANGE_TOKEN", "current_password")
    ///     .await?;
    /// ```
    pub async fn confirm_email_change(
        &self,
        email_change_token: &str,
        password: &str,
    ) -> Result<(), RequestError> {
        let url = self.endpoint("confirm-email-change");

        let body = EmailChangeConfirmation {
            token: email_change_token,
            password,
        };

        let request = self.client.request_post_json(&url, &body, None);

        PocketBase::execute_empty(request).await
    }
}
