use crate::error::RequestError;
use crate::{Collection, PocketBase};

impl<'a> Collection<'a> {
    /// Delete a single record.
    ///
    /// An empty `record_id` fails with [`RequestError::NotFound`] without
    /// sending a request.
    ///
    /// # Example
    /// ```rust,ignore
    /// pb.users()
    ///     .delete("RECORD_ID", Some(&session.token))
    ///     .await?;
    /// ```
    pub async fn delete(&self, record_id: &'a str, token: Option<&str>) -> Result<(), RequestError> {
        let endpoint = self.record_endpoint(record_id, &[])?;

        let request = self.client.request_delete(&endpoint, token);

        PocketBase::execute_empty(request).await
    }
}
