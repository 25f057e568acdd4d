use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::error::RequestError;
use crate::{Collection, PocketBase, RecordList, RecordQuery};

/// Builder returned by [`Collection::get_list`].
pub struct CollectionGetListBuilder<'a, T> {
    collection: Collection<'a>,
    query: RecordQuery,
    token: Option<&'a str>,
    _marker: PhantomData<T>,
}

impl<'a> Collection<'a> {
    /// Fetch a paginated records list from the given collection.
    ///
    /// # Example
    /// ```rust,ignore
    /// let users = pb
    ///     .users()
    ///     .get_list::<UserRecord>()
    ///     .page(2)
    ///     .per_page(50)
    ///     .sort("-created,id")
    ///     .call()
    ///     .await?;
    ///
    /// for user in users.items {
    ///     println!("{user:?}");
    /// }
    /// ```
    #[must_use]
    pub fn get_list<T: DeserializeOwned>(self) -> CollectionGetListBuilder<'a, T> {
        CollectionGetListBuilder {
            collection: self,
            query: RecordQuery::default(),
            token: None,
            _marker: PhantomData,
        }
    }
}

impl<'a, T: DeserializeOwned> CollectionGetListBuilder<'a, T> {
    /// Replaces every list option at once.
    #[must_use]
    pub fn query(mut self, query: RecordQuery) -> Self {
        self.query = query;
        self
    }

    /// The page (aka. offset) of the paginated list (default to 1).
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.query.page = page;
        self
    }

    /// Set the max returned records per page (default: 30, max: 500).
    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.query.per_page = per_page;
        self
    }

    /// Specify the records order attribute(s).
    /// Add `-`/`+` (default) in front of the attribute for DESC / ASC order.
    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.query.sort = Some(sort.into());
        self
    }

    /// Filter the returned records.
    ///
    /// Supports operators: `=`, `!=`, `>`, `>=`, `<`, `<=`, `~`, `!~`
    /// and their "any/at least one" variants with `?` prefix.
    /// Combine with `&&` (AND), `||` (OR), and `(...)` for grouping.
    /// See [`crate::Filter`] to build the expression.
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.query.filter = Some(filter.into());
        self
    }

    /// Auto expand record relations (up to 6-levels deep).
    #[must_use]
    pub fn expand(mut self, expand: impl Into<String>) -> Self {
        self.query.expand = Some(expand.into());
        self
    }

    /// Only return the given comma separated fields.
    #[must_use]
    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.query.fields = Some(fields.into());
        self
    }

    /// Skip total count query for better performance.
    ///
    /// When enabled, `totalItems` and `totalPages` will be `-1`.
    #[must_use]
    pub fn skip_total(mut self, skip_total: bool) -> Self {
        self.query.skip_total = skip_total;
        self
    }

    /// Sends the request with `Authorization: Bearer <token>`.
    #[must_use]
    pub const fn token(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    /// Execute the request and return the paginated results.
    pub async fn call(self) -> Result<RecordList<T>, RequestError> {
        let url = self.collection.endpoint("records");

        let request = self.collection.client.request_get(
            &url,
            &self.query.query_pairs(),
            self.token,
        );

        PocketBase::execute_json::<RecordList<T>>(request).await
    }
}
