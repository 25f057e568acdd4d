//! `PocketBase` realtime (server-sent events) API.

use reqwest::header::ACCEPT;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};

pub use event_stream::ServerEvent;
use event_stream::EventStream;

use crate::error::RequestError;
use crate::{Collection, PocketBase, UserRecord};

mod event_stream;

/// Name of the first event sent on every realtime connection.
const CONNECT_EVENT: &str = "PB_CONNECT";

/// A record change pushed by the server.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RecordEvent<T = UserRecord> {
    /// `create`, `update` or `delete`.
    pub action: String,
    /// The record after the change (before it, for `delete`).
    pub record: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectPayload {
    client_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionRequest<'a> {
    client_id: &'a str,
    subscriptions: &'a [&'a str],
}

/// Entry point of the realtime API, see [`PocketBase::realtime`].
#[derive(Clone, Copy, Debug)]
pub struct Realtime<'a> {
    client: &'a PocketBase,
}

impl PocketBase {
    /// Access to the realtime API.
    #[must_use]
    pub const fn realtime(&self) -> Realtime<'_> {
        Realtime { client: self }
    }
}

impl Realtime<'_> {
    /// Opens the event stream and waits for the server to assign a client id.
    ///
    /// The connection stays open until the [`RealtimeConnection`] is dropped.
    /// With a client from [`PocketBase::builder`] it isn't bound by the
    /// request timeout, only by the connect timeout. Every other setting
    /// (user agent included) is shared with regular requests.
    ///
    /// # Example
    /// ```rust,ignore
    /// let mut connection = pb.realtime().connect().await?;
    /// connection.subscribe(&["users/*"], None).await?;
    ///
    /// while let Some(event) = connection.next_event::<UserRecord>().await? {
    ///     println!("{} {}", event.action, event.record.id);
    /// }
    /// ```
    pub async fn connect(self) -> Result<RealtimeConnection, RequestError> {
        let url = format!("{}/api/realtime", self.client.base_url);

        let request = self
            .client
            .stream_client
            .get(&url)
            .header(ACCEPT, "text/event-stream");

        let response = PocketBase::execute(request).await?;
        let mut events = EventStream::new(response);

        let client_id = loop {
            let Some(event) = events.next().await? else {
                return Err(RequestError::Decode(serde_json::Error::custom(
                    "realtime stream closed before PB_CONNECT",
                )));
            };

            if event.event == CONNECT_EVENT {
                let payload: ConnectPayload =
                    serde_json::from_str(&event.data).map_err(RequestError::Decode)?;
                break payload.client_id;
            }
        };

        tracing::debug!(%client_id, "Realtime connection established");

        Ok(RealtimeConnection {
            client: self.client.clone(),
            client_id,
            events,
        })
    }
}

impl Collection<'_> {
    /// Opens a realtime connection subscribed to every record of the collection
    /// (`<collection>/*`).
    ///
    /// # Example
    /// ```rust,ignore
    /// let mut users = pb.users().listen(Some(&session.token)).await?;
    ///
    /// while let Some(event) = users.next_event::<UserRecord>().await? {
    ///     println!("{}: {}", event.action, event.record.username);
    /// }
    /// ```
    pub async fn listen(&self, token: Option<&str>) -> Result<RealtimeConnection, RequestError> {
        let topic = format!("{}/*", self.name);

        let connection = self.client.realtime().connect().await?;
        connection.subscribe(&[topic.as_str()], token).await?;

        Ok(connection)
    }
}

/// An open realtime connection.
///
/// Events are read one at a time with [`RealtimeConnection::next_event`].
/// Drop the connection to stop listening.
#[derive(Debug)]
pub struct RealtimeConnection {
    client: PocketBase,
    client_id: String,
    events: EventStream,
}

impl RealtimeConnection {
    /// Id assigned by the server to this connection.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Sets the topics this connection receives, replacing previous ones.
    ///
    /// Topics are `<collection>/*` or `<collection>/<record id>`. An empty
    /// slice unsubscribes from everything. Records are only pushed if `token`
    /// satisfies the collection's view rule.
    pub async fn subscribe(
        &self,
        subscriptions: &[&str],
        token: Option<&str>,
    ) -> Result<(), RequestError> {
        let url = format!("{}/api/realtime", self.client.base_url);

        let body = SubscriptionRequest {
            client_id: &self.client_id,
            subscriptions,
        };

        let request = self.client.request_post_json(&url, &body, token);

        PocketBase::execute_empty(request).await?;

        tracing::debug!(client_id = %self.client_id, ?subscriptions, "Realtime subscriptions set");

        Ok(())
    }

    /// Next raw event, `None` once the server closed the stream.
    pub async fn next_server_event(&mut self) -> Result<Option<ServerEvent>, RequestError> {
        self.events.next().await
    }

    /// Next record change, `None` once the server closed the stream.
    ///
    /// Connection events and events with an empty payload are skipped. A
    /// payload that doesn't match
    /// [`RecordEvent<T>`] fails with [`RequestError::Decode`]; the connection
    /// stays usable afterwards.
    pub async fn next_event<T: DeserializeOwned>(
        &mut self,
    ) -> Result<Option<RecordEvent<T>>, RequestError> {
        while let Some(event) = self.events.next().await? {
            if event.event == CONNECT_EVENT || event.data.is_empty() {
                continue;
            }

            return serde_json::from_str(&event.data)
                .map(Some)
                .map_err(RequestError::Decode);
        }

        Ok(None)
    }
}
