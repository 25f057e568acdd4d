use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::RequestError;
use crate::{Collection, LinkedAccount, PocketBase};

/// `PocketBase` returns a list; older versions return an object keyed by link id.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExternalAuthsPayload {
    List(Vec<LinkedAccount>),
    Keyed(Map<String, Value>),
}

impl ExternalAuthsPayload {
    fn into_accounts(self) -> Result<Vec<LinkedAccount>, serde_json::Error> {
        match self {
            Self::List(accounts) => Ok(accounts),
            Self::Keyed(accounts) => accounts
                .into_iter()
                .map(|(id, account)| {
                    let mut account: LinkedAccount = serde_json::from_value(account)?;
                    account.id = id;
                    Ok(account)
                })
                .collect(),
        }
    }
}

impl<'a> Collection<'a> {
    /// Lists the OAuth2 accounts linked to a user.
    ///
    /// Only superusers and the account owner may call it.
    ///
    /// # Example
    /// ```rust,ignore
    /// let accounts = pb
    ///     .users()
    ///     .list_external_auths(&session.record.id, &session.token)
    ///     .await?;
    /// ```
    pub async fn list_external_auths(
        &self,
        record_id: &'a str,
        token: &str,
    ) -> Result<Vec<LinkedAccount>, RequestError> {
        let url = self.record_endpoint(record_id, &["external-auths"])?;

        let request = self.client.request_get(&url, &[], Some(token));

        PocketBase::execute_json::<ExternalAuthsPayload>(request)
            .await?
            .into_accounts()
            .map_err(RequestError::Decode)
    }

    /// Unlinks an OAuth2 provider from a user.
    ///
    /// Only superusers and the account owner may call it. Fails with
    /// [`RequestError::AuthenticationFailed`] when `token` is rejected.
    ///
    /// # Example
    /// ```rust,ignore
    /// pb.users()
    ///     .unlink_external_auth(&session.record.id, "github", &session.token)
    ///     .await?;
    /// ```
    pub async fn unlink_external_auth(
        &self,
        record_id: &'a str,
        provider: &str,
        token: &str,
    ) -> Result<(), RequestError> {
        let url = self.record_endpoint(record_id, &["external-auths", provider])?;

        let request = self.client.request_delete(&url, Some(token));

        PocketBase::execute_empty(request).await
    }
}
