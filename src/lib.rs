//! `pocketbase-users` is a stateless Rust client for `PocketBase`'s user records,
//! authentication flows, OAuth2 linking and realtime API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::error::Error;
//!
//! use pocketbase_users::{Filter, Operator, PocketBase, RecordQuery, UserRecord};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn Error>> {
//!     let pb = PocketBase::new("http://localhost:8090")?;
//!
//!     let session = pb
//!         .users()
//!         .auth_with_password("YOUR_EMAIL_OR_USERNAME", "YOUR_PASSWORD")
//!         .await?;
//!
//!     let admins = pb
//!         .users()
//!         .get_list::<UserRecord>()
//!         .query(
//!             RecordQuery::new()
//!                 .per_page(50)
//!                 .filter(Filter::new().add("role", Operator::Equal, "'admin'")),
//!         )
//!         .token(&session.token)
//!         .call()
//!         .await?;
//!
//!     for admin in admins.items {
//!         println!("{}", admin.username);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub use config::ClientBuilder;
pub use error::*;
pub use query::{Filter, Operator, RecordQuery};
pub use realtime::{Realtime, RealtimeConnection, RecordEvent, ServerEvent};
pub use records::auth::{AuthProvider, AuthSession, LinkedAccount};
pub use records::crud::create::CreateResponse;
pub use records::crud::get_first_list_item::CollectionGetFirstListItemBuilder;
pub use records::crud::get_full_list::CollectionGetFullListBuilder;
pub use records::crud::get_list::CollectionGetListBuilder;
pub use records::crud::get_one::CollectionGetOneBuilder;
pub use records::user::{PreparedUser, PreparedUserUpdate, UserRecord};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::RequestBuilder;
pub use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;
pub mod query;
pub mod realtime;
pub(crate) mod records;

/// Name of the default auth collection.
pub const USERS_COLLECTION: &str = "users";

pub(crate) const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Represents a specific collection in a `PocketBase` database.
///
/// Instances are created with [`PocketBase::collection`] or
/// [`PocketBase::users`]. The handle only borrows the client: it holds no
/// state of its own, and every token-bearing method takes the token as an
/// argument.
#[derive(Clone, Copy, Debug)]
pub struct Collection<'a> {
    pub(crate) client: &'a PocketBase,
    pub(crate) name: &'a str,
}

impl PocketBase {
    /// Creates a new [`Collection`] instance for the specified collection name.
    ///
    /// # Example
    /// ```rust,ignore
    /// let pb = PocketBase::new("http://localhost:8090")?;
    ///
    /// let user = pb
    ///     .collection("members")
    ///     .get_one::<UserRecord>("RECORD_ID")
    ///     .call()
    ///     .await?;
    /// ```
    ///
    /// # Panics
    ///
    /// This method will panic if the collection name is empty or contains invalid characters.
    /// Use [`PocketBase::try_collection`] for names that come from user input.
    #[must_use]
    pub fn collection<'a>(&'a self, collection_name: &'a str) -> Collection<'a> {
        match self.try_collection(collection_name) {
            Ok(collection) => collection,
            Err(error) => panic!("{error}"),
        }
    }

    /// Like [`PocketBase::collection`], failing with
    /// [`ConfigError::InvalidCollectionName`] instead of panicking.
    ///
    /// Collection names must be non-empty and only contain alphanumeric
    /// characters and underscores.
    pub fn try_collection<'a>(
        &'a self,
        collection_name: &'a str,
    ) -> Result<Collection<'a>, ConfigError> {
        let valid = !collection_name.is_empty()
            && collection_name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_');

        if !valid {
            return Err(ConfigError::InvalidCollectionName(
                collection_name.to_string(),
            ));
        }

        Ok(Collection {
            client: self,
            name: collection_name,
        })
    }

    /// Shortcut for `pb.collection("users")`.
    #[must_use]
    pub const fn users(&self) -> Collection<'_> {
        Collection {
            client: self,
            name: USERS_COLLECTION,
        }
    }
}

impl Collection<'_> {
    /// Name of the collection.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/api/collections/{}/{}",
            self.client.base_url, self.name, path
        )
    }

    /// `records/{record_id}/{segments..}`, each part percent-encoded as one
    /// path segment.
    ///
    /// An empty id or segment would point at another endpoint (the list for an
    /// empty id), so it fails before any request is sent.
    pub(crate) fn record_endpoint(
        &self,
        record_id: &str,
        segments: &[&str],
    ) -> Result<String, RequestError> {
        if record_id.is_empty() {
            return Err(RequestError::NotFound("Record id cannot be empty.".to_string()));
        }

        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(RequestError::NotFound("Path segment cannot be empty.".to_string()));
        }

        let mut url = reqwest::Url::parse(&self.endpoint("records"))
            .map_err(|error| RequestError::NotFound(format!("Invalid record URL: {error}")))?;

        url.path_segments_mut()
            .map_err(|()| RequestError::NotFound("Invalid record URL.".to_string()))?
            .push(record_id)
            .extend(segments);

        Ok(url.into())
    }
}

/// Represents a paginated list of records retrieved from a `PocketBase` collection.
///
/// When the list was requested with `skipTotal`, `total_items` and
/// `total_pages` are `-1`. Use [`RecordList::totals`] rather than reading them
/// directly.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordList<T> {
    /// The page (aka. offset) of the paginated list *(default to 1)*.
    pub page: i32,
    /// The max returned records per page *(default to 30)*.
    pub per_page: i32,
    /// The total amount of records found in the collection.
    pub total_items: i32,
    /// The total amount of pages found in the collection.
    pub total_pages: i32,
    /// A list of all records for the given page.
    pub items: Vec<T>,
}

impl<T> RecordList<T> {
    /// `(total_items, total_pages)`, or `None` when totals were skipped.
    #[must_use]
    pub const fn totals(&self) -> Option<(i32, i32)> {
        if self.total_items < 0 || self.total_pages < 0 {
            None
        } else {
            Some((self.total_items, self.total_pages))
        }
    }
}

/// A stateless `PocketBase` client for sending requests to a `PocketBase` instance.
///
/// The client only holds the base URL and a `reqwest` client. It keeps no
/// session: token-bearing calls receive the token as an argument. Cloning is
/// cheap and clones may be used concurrently.
///
/// # Example
/// ```rust,ignore
/// use pocketbase_users::{PocketBase, UserRecord};
///
/// let pb = PocketBase::new("http://localhost:8090")?;
///
/// let user = pb
///     .users()
///     .get_one::<UserRecord>("RECORD_ID")
///     .call()
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct PocketBase {
    pub(crate) base_url: String,
    pub(crate) reqwest_client: reqwest::Client,
    /// Same settings as `reqwest_client`, minus the total timeout.
    pub(crate) stream_client: reqwest::Client,
}

impl PocketBase {
    /// Creates a new instance of the `PocketBase` client with the default
    /// timeouts (30s per request, 10s to connect).
    ///
    /// # Example
    /// ```rust
    /// use pocketbase_users::PocketBase;
    ///
    /// let pb = PocketBase::new("http://localhost:8090").unwrap();
    /// assert_eq!(pb.base_url(), "http://localhost:8090");
    /// ```
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Self::builder(base_url).build()
    }

    /// Starts a [`ClientBuilder`] for custom timeouts.
    #[must_use]
    pub fn builder(base_url: &str) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Creates a client from the `POCKETBASE_URL` environment variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        ClientBuilder::from_env()?.build()
    }

    /// Creates a new `PocketBase` client with a custom reqwest client.
    ///
    /// The client is also used for realtime streams, so a total timeout set
    /// on it bounds how long [`PocketBase::realtime`] connections stay open.
    ///
    /// # Example
    /// ```rust
    /// use std::time::Duration;
    /// use pocketbase_users::PocketBase;
    ///
    /// let reqwest_client = reqwest::Client::builder()
    ///     .timeout(Duration::from_secs(60))
    ///     .build()
    ///     .unwrap();
    ///
    /// let pb = PocketBase::new_with_client("http://localhost:8090", reqwest_client).unwrap();
    /// ```
    pub fn new_with_client(base_url: &str, client: reqwest::Client) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: config::normalize_base_url(base_url)?,
            stream_client: client.clone(),
            reqwest_client: client,
        })
    }

    /// Returns the base URL of the `PocketBase` server, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PocketBase {
    /// Adds an authorization token to the request, if given.
    pub(crate) fn with_authorization_token(
        request_builder: RequestBuilder,
        token: Option<&str>,
    ) -> RequestBuilder {
        if let Some(token) = token {
            request_builder.bearer_auth(token)
        } else {
            request_builder
        }
    }

    /// Creates a POST request builder without body.
    pub(crate) fn request_post(&self, endpoint: &str, token: Option<&str>) -> RequestBuilder {
        let request_builder = self
            .reqwest_client
            .post(endpoint)
            .header(ACCEPT, "application/json");

        Self::with_authorization_token(request_builder, token)
    }

    /// Creates a POST request builder with JSON body.
    pub(crate) fn request_post_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
        token: Option<&str>,
    ) -> RequestBuilder {
        let request_builder = self
            .reqwest_client
            .post(endpoint)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(params);

        Self::with_authorization_token(request_builder, token)
    }

    /// Creates a PATCH request builder with JSON body.
    pub(crate) fn request_patch_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
        token: Option<&str>,
    ) -> RequestBuilder {
        let request_builder = self
            .reqwest_client
            .patch(endpoint)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(params);

        Self::with_authorization_token(request_builder, token)
    }

    /// Creates a POST request builder with a multipart form body.
    pub(crate) fn request_post_form(
        &self,
        endpoint: &str,
        form: Form,
        token: Option<&str>,
    ) -> RequestBuilder {
        let request_builder = self.reqwest_client.post(endpoint).multipart(form);

        Self::with_authorization_token(request_builder, token)
    }

    /// Creates a GET request builder accepting JSON, with optional query parameters.
    pub(crate) fn request_get(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        token: Option<&str>,
    ) -> RequestBuilder {
        let mut request_builder = self
            .reqwest_client
            .get(endpoint)
            .header(ACCEPT, "application/json");

        if !params.is_empty() {
            request_builder = request_builder.query(params);
        }

        Self::with_authorization_token(request_builder, token)
    }

    /// Creates a DELETE request builder.
    pub(crate) fn request_delete(&self, endpoint: &str, token: Option<&str>) -> RequestBuilder {
        let request_builder = self.reqwest_client.delete(endpoint);

        Self::with_authorization_token(request_builder, token)
    }

    /// Sends the request and maps any non-success status to a [`RequestError`].
    pub(crate) async fn execute(
        request: RequestBuilder,
    ) -> Result<reqwest::Response, RequestError> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(%error, "PocketBase request failed");
                return Err(RequestError::Transport(error));
            }
        };

        let status = response.status();
        tracing::debug!(url = %response.url(), %status, "PocketBase responded");

        if status.is_success() {
            return Ok(response);
        }

        tracing::warn!(url = %response.url(), %status, "PocketBase returned an error status");

        Err(RequestError::from_response(response).await)
    }

    /// Sends the request and decodes the JSON body of a successful response.
    pub(crate) async fn execute_json<T: DeserializeOwned>(
        request: RequestBuilder,
    ) -> Result<T, RequestError> {
        let response = Self::execute(request).await?;
        decode_json(response).await
    }

    /// Sends the request and drops the body of a successful response.
    pub(crate) async fn execute_empty(request: RequestBuilder) -> Result<(), RequestError> {
        Self::execute(request).await.map(drop)
    }
}

/// Reads the whole body and decodes it, keeping transport and decode failures apart.
pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, RequestError> {
    let body = response.bytes().await?;

    serde_json::from_slice(&body).map_err(|error| {
        tracing::warn!(%error, "Couldn't decode PocketBase response");
        RequestError::Decode(error)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_endpoint_encodes_each_segment() {
        let pb = PocketBase::new("http://localhost:8090/base").unwrap();
        let users = pb.users();

        assert_eq!(
            users.record_endpoint("abc", &[]).unwrap(),
            "http://localhost:8090/base/api/collections/users/records/abc"
        );
        assert_eq!(
            users.record_endpoint("a/b?c", &[]).unwrap(),
            "http://localhost:8090/base/api/collections/users/records/a%2Fb%3Fc"
        );
        assert_eq!(
            users
                .record_endpoint("u1", &["external-auths", "git/hub"])
                .unwrap(),
            "http://localhost:8090/base/api/collections/users/records/u1/external-auths/git%2Fhub"
        );
    }

    #[test]
    fn record_endpoint_rejects_empty_parts() {
        let pb = PocketBase::new("http://localhost:8090").unwrap();
        let users = pb.users();

        assert!(matches!(
            users.record_endpoint("", &[]),
            Err(RequestError::NotFound(_))
        ));
        assert!(matches!(
            users.record_endpoint("u1", &["external-auths", ""]),
            Err(RequestError::NotFound(_))
        ));
    }

    #[test]
    fn try_collection_validates_names() {
        let pb = PocketBase::new("http://localhost:8090").unwrap();

        assert_eq!(pb.try_collection("team_members").unwrap().name(), "team_members");
        assert!(matches!(
            pb.try_collection(""),
            Err(ConfigError::InvalidCollectionName(_))
        ));
        assert!(matches!(
            pb.try_collection("users/../admins"),
            Err(ConfigError::InvalidCollectionName(name)) if name == "users/../admins"
        ));
    }

    #[test]
    #[should_panic(expected = "Invalid collection name")]
    fn collection_panics_on_invalid_name() {
        let pb = PocketBase::new("http://localhost:8090").unwrap();
        let _ = pb.collection("bad name");
    }
}
