use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::error::RequestError;
use crate::{Collection, PocketBase};

/// Builder returned by [`Collection::get_one`].
pub struct CollectionGetOneBuilder<'a, T> {
    collection: Collection<'a>,
    record_id: &'a str,
    expand: Option<&'a str>,
    fields: Option<&'a str>,
    token: Option<&'a str>,
    _marker: PhantomData<T>,
}

impl<'a> Collection<'a> {
    /// Fetch a single record.
    ///
    /// An empty `record_id` fails with [`RequestError::NotFound`] without
    /// sending a request.
    ///
    /// # Example
    /// ```rust,ignore
    /// let user = pb
    ///     .users()
    ///     .get_one::<UserRecord>("record_id_123")
    ///     .call()
    ///     .await?;
    /// ```
    #[must_use]
    pub const fn get_one<T: DeserializeOwned>(
        self,
        record_id: &'a str,
    ) -> CollectionGetOneBuilder<'a, T> {
        CollectionGetOneBuilder {
            collection: self,
            record_id,
            expand: None,
            fields: None,
            token: None,
            _marker: PhantomData,
        }
    }
}

impl<'a, T: DeserializeOwned> CollectionGetOneBuilder<'a, T> {
    /// Auto expand record relations (up to 6-levels deep).
    ///
    /// Expanded relations are appended under the `expand` property.
    /// Only relations the user has view permissions for will be expanded.
    #[must_use]
    pub const fn expand(mut self, expand: &'a str) -> Self {
        self.expand = Some(expand);
        self
    }

    /// Only return the given comma separated fields.
    #[must_use]
    pub const fn fields(mut self, fields: &'a str) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Sends the request with `Authorization: Bearer <token>`.
    #[must_use]
    pub const fn token(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    /// Execute the request and return the record.
    pub async fn call(self) -> Result<T, RequestError> {
        let url = self.collection.record_endpoint(self.record_id, &[])?;

        let params: Vec<(&str, String)> = [("expand", self.expand), ("fields", self.fields)]
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key, value.to_string())))
            .collect();

        let request = self.collection.client.request_get(&url, &params, self.token);

        PocketBase::execute_json::<T>(request).await
    }
}
