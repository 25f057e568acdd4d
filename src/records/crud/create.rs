use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::{Collection, PocketBase};

/// Contains information about the successfully created Record
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    /// Name of the collection the record was created in.
    pub collection_name: String,
    /// ID of the collection the record was created in.
    pub collection_id: String,
    /// ID of the new record.
    pub id: String,
    /// Last update timestamp.
    pub updated: String,
    /// Creation timestamp.
    pub created: String,
}

impl Collection<'_> {
    /// Create a new record.
    ///
    /// For file uploads (e.g. an avatar), use [`Collection::create_multipart()`].
    /// Setting `verified` requires a superuser `token`.
    ///
    /// # Example
    /// ```rust,ignore
    /// let created = pb
    ///     .users()
    ///     .create(&PreparedUser {
    ///         username: "ann".to_string(),
    ///         email: "ann@example.com".to_string(),
    ///         password: "12345678".to_string(),
    ///         password_confirm: "12345678".to_string(),
    ///         ..Default::default()
    ///     }, None)
    ///     .await?;
    ///
    /// println!("New user: {}", created.id);
    /// ```
    pub async fn create<T: Serialize + ?Sized>(
        &self,
        record: &T,
        token: Option<&str>,
    ) -> Result<CreateResponse, RequestError> {
        let endpoint = self.endpoint("records");

        let request = self.client.request_post_json(&endpoint, record, token);

        PocketBase::execute_json::<CreateResponse>(request).await
    }

    /// Create a new record with multipart form data (e.g., for file uploads).
    ///
    /// # Example
    /// ```rust,ignore
    /// use pocketbase_users::{Form, Part};
    ///
    /// let avatar = std::fs::read("./ann.png")?;
    ///
    /// let avatar_part = Part::bytes(avatar)
    ///     .file_name("ann.png")
    ///     .mime_str("image/png")?;
    ///
    /// let form = Form::new()
    ///     .text("username", "ann")
    ///     .text("password", "12345678")
    ///     .text("passwordConfirm", "12345678")
    ///     .part("avatar", avatar_part);
    ///
    /// let created = pb.users().create_multipart(form, None).await?;
    /// ```
    pub async fn create_multipart(
        &self,
        form: reqwest::multipart::Form,
        token: Option<&str>,
    ) -> Result<CreateResponse, RequestError> {
        let endpoint = self.endpoint("records");

        let request = self.client.request_post_form(&endpoint, form, token);

        PocketBase::execute_json::<CreateResponse>(request).await
    }
}
