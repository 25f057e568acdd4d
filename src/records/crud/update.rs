use serde::Serialize;

use crate::error::RequestError;
use crate::{Collection, PocketBase};

impl<'a> Collection<'a> {
    /// Update a single record.
    ///
    /// An empty `record_id` fails with [`RequestError::NotFound`] without
    /// sending a request.
    ///
    /// Only the fields present in the payload are changed. With
    /// [`crate::PreparedUserUpdate`], fields left to `None` are not sent.
    ///
    /// # Example
    /// ```rust,ignore
    /// pb.users()
    ///     .update(
    ///         "record_id_123",
    ///         &PreparedUserUpdate {
    ///             name: Some("Ann Smith".to_string()),
    ///             ..Default::default()
    ///         },
    ///         Some(&session.token),
    ///     )
    ///     .await?;
    /// ```
    pub async fn update<T: Serialize + ?Sized>(
        &self,
        record_id: &'a str,
        record: &T,
        token: Option<&str>,
    ) -> Result<(), RequestError> {
        let endpoint = self.record_endpoint(record_id, &[])?;

        let request = self.client.request_patch_json(&endpoint, record, token);

        PocketBase::execute_empty(request).await
    }
}
