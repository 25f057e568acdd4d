use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::error::RequestError;
use crate::{Collection, PocketBase, RecordList, RecordQuery};

/// Builder returned by [`Collection::get_first_list_item`].
pub struct CollectionGetFirstListItemBuilder<'a, T> {
    collection: Collection<'a>,
    sort: Option<String>,
    filter: Option<String>,
    expand: Option<String>,
    fields: Option<String>,
    token: Option<&'a str>,
    _marker: PhantomData<T>,
}

impl<'a> Collection<'a> {
    /// Fetch the first record matching the filter.
    ///
    /// Fails with [`RequestError::NotFound`] when nothing matches.
    ///
    /// # Example
    /// ```rust,ignore
    /// let ann = pb
    ///     .users()
    ///     .get_first_list_item::<UserRecord>()
    ///     .filter("username='ann'")
    ///     .call()
    ///     .await?;
    /// ```
    #[must_use]
    pub const fn get_first_list_item<T: DeserializeOwned>(
        self,
    ) -> CollectionGetFirstListItemBuilder<'a, T> {
        CollectionGetFirstListItemBuilder {
            collection: self,
            sort: None,
            filter: None,
            expand: None,
            fields: None,
            token: None,
            _marker: PhantomData,
        }
    }
}

impl<'a, T: DeserializeOwned> CollectionGetFirstListItemBuilder<'a, T> {
    /// Set the sort order. Prefix with `-` for DESC or `+` for ASC (default).
    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Filter the returned records, see [`crate::Filter`].
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Auto expand record relations (up to 6-levels deep).
    #[must_use]
    pub fn expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = Some(expand.into());
        self
    }

    /// Only return the given comma separated fields.
    #[must_use]
    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Sends the request with `Authorization: Bearer <token>`.
    #[must_use]
    pub const fn token(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    /// Execute the request and return the first matching record.
    pub async fn call(self) -> Result<T, RequestError> {
        let url = self.collection.endpoint("records");

        let query = RecordQuery {
            page: 1,
            per_page: 1,
            sort: self.sort,
            filter: self.filter,
            skip_total: true,
            expand: self.expand,
            fields: self.fields,
        };

        let request = self
            .collection
            .client
            .request_get(&url, &query.query_pairs(), self.token);

        let records = PocketBase::execute_json::<RecordList<T>>(request).await?;

        records
            .items
            .into_iter()
            .next()
            .ok_or_else(|| RequestError::NotFound("No record matches the filter.".to_string()))
    }
}
