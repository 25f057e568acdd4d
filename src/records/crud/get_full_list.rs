use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::error::RequestError;
use crate::{Collection, PocketBase, RecordList, RecordQuery};

/// Largest page `PocketBase` accepts.
const MAX_BATCH_SIZE: u32 = 500;

/// Builder for fetching all records from a collection.
pub struct CollectionGetFullListBuilder<'a, T> {
    collection: Collection<'a>,
    batch_size: u32,
    sort: Option<String>,
    filter: Option<String>,
    expand: Option<String>,
    fields: Option<String>,
    token: Option<&'a str>,
    _marker: PhantomData<T>,
}

impl<'a> Collection<'a> {
    /// Fetch all records from the collection.
    ///
    /// Pages through the list with `skipTotal=true` until a page comes back
    /// shorter than the batch size.
    ///
    /// # Example
    /// ```rust,ignore
    /// let everyone = pb
    ///     .users()
    ///     .get_full_list::<UserRecord>()
    ///     .sort("-created")
    ///     .call()
    ///     .await?;
    ///
    /// println!("Total users: {}", everyone.len());
    /// ```
    #[must_use]
    pub const fn get_full_list<T: DeserializeOwned>(self) -> CollectionGetFullListBuilder<'a, T> {
        CollectionGetFullListBuilder {
            collection: self,
            batch_size: MAX_BATCH_SIZE,
            sort: None,
            filter: None,
            expand: None,
            fields: None,
            token: None,
            _marker: PhantomData,
        }
    }
}

impl<'a, T: DeserializeOwned> CollectionGetFullListBuilder<'a, T> {
    /// Set the batch size for pagination (default: 500, clamped to 1..=500).
    #[must_use]
    pub fn batch_size(mut self, size: u32) -> Self {
        self.batch_size = size.clamp(1, MAX_BATCH_SIZE);
        self
    }

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

    /// Sends the requests with `Authorization: Bearer <token>`.
    #[must_use]
    pub const fn token(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    /// Execute the requests and return all matching records.
    pub async fn call(self) -> Result<Vec<T>, RequestError> {
        let url = self.collection.endpoint("records");

        let mut query = RecordQuery {
            page: 1,
            per_page: self.batch_size,
            sort: self.sort,
            filter: self.filter,
            skip_total: true,
            expand: self.expand,
            fields: self.fields,
        };

        let mut all_records = Vec::new();

        loop {
            let request = self
                .collection
                .client
                .request_get(&url, &query.query_pairs(), self.token);

            let records_page = PocketBase::execute_json::<RecordList<T>>(request).await?;

            let items_count = records_page.items.len();
            all_records.extend(records_page.items);

            // Totals are skipped, a short page means the end of the list.
            if items_count < self.batch_size as usize {
                break;
            }

            query.page += 1;
        }

        tracing::debug!(
            collection = self.collection.name,
            records = all_records.len(),
            pages = query.page,
            "Fetched full list"
        );

        Ok(all_records)
    }
}
