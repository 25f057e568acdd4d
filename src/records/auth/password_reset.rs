use std::collections::HashMap;

use serde::Serialize;

use crate::error::RequestError;
use crate::{Collection, PocketBase};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResetConfirmation<'a> {
    token: &'a str,
    password: &'a str,
    password_confirm: &'a str,
}

impl Collection<'_> {
    /// Sends a password reset email containing a reset token.
    ///
    /// # Example
    /// ```rust,ignore
    /// pb.users()
    ///     .request_password_reset("test@example.com")
    ///     .await?;
    /// ```
    pub async fn request_password_reset(&self, email: &str) -> Result<(), RequestError> {
        let url = self.endpoint("request-password-reset");

        let body: HashMap<&str, &str> = HashMap::from([("email", email)]);

        let request = self.client.request_post_json(&url, &body, None);

        PocketBase::execute_empty(request).await
    }

    /// Sets a new password with the token received by email.
    ///
    /// Every auth token previously issued to the user stops working.
    ///
    /// # Example
    /// ```rust,ignore
    /// pb.users()
    ///     .confirm_password_reset("RESET_TOKEN", "new_password", "new_password")
    ///     .await?;
    /// ```
    pub async fn confirm_password_reset(
        &self,
        reset_token: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<(), RequestError> {
        let url = self.endpoint("confirm-password-reset");

        let body = PasswordResetConfirmation {
            token: reset_token,
            password,
            password_confirm,
        };

        let request = self.client.request_post_json(&url, &body, None);

        PocketBase::execute_empty(request).await
    }
}
