use serde_json::{Map, Value};

use crate::error::RequestError;
use crate::{AuthProvider, Collection, PocketBase};

impl Collection<'_> {
    /// Lists the OAuth2 providers enabled for the collection, with fresh
    /// handshake parameters for each.
    ///
    /// The server answers with one JSON object per provider, keyed by provider
    /// name. Providers are returned in the server's order.
    ///
    /// # Example
    /// ```rust,ignore
    /// let providers = pb.users().list_auth_methods().await?;
    ///
    /// for provider in providers {
    ///     println!("{}: {}", provider.name, provider.auth_url);
    /// }
    /// ```
    pub async fn list_auth_methods(&self) -> Result<Vec<AuthProvider>, RequestError> {
        let url = self.endpoint("auth-providers");

        let request = self.client.request_get(&url, &[], None);

        let providers = PocketBase::execute_json::<Map<String, Value>>(request).await?;

        providers
            .into_iter()
            .map(|(name, provider)| {
                let mut provider: AuthProvider =
                    serde_json::from_value(provider).map_err(RequestError::Decode)?;
                provider.name = name;

                Ok(provider)
            })
            .collect()
    }
}
