use std::collections::HashMap;
use std::fmt;

use crate::platforms::mapping::{CredentialKind, PLATFORMS};

/// One platform's credential set. Secrets never appear in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    ApiKey {
        api_key: String,
    },
    PublisherKey {
        publisher_id: String,
        api_key: String,
    },
    OAuth {
        client_id: String,
        client_secret: String,
        access_token: String,
    },
}

impl Credentials {
    /// Builds a credential set from values ordered as in `PlatformSpec::credential_env`.
    /// Returns `None` when the count does not match the kind.
    pub fn from_values(kind: CredentialKind, values: Vec<String>) -> Option<Self> {
        match kind {
            CredentialKind::ApiKey => {
                let [api_key] = <[String; 1]>::try_from(values).ok()?;
                Some(Self::ApiKey { api_key })
            }
            CredentialKind::PublisherKey => {
                let [publisher_id, api_key] = <[String; 2]>::try_from(values).ok()?;
                Some(Self::PublisherKey {
                    publisher_id,
                    api_key,
                })
            }
            CredentialKind::OAuth => {
                let [client_id, client_secret, access_token] =
                    <[String; 3]>::try_from(values).ok()?;
                Some(Self::OAuth {
                    client_id,
                    client_secret,
                    access_token,
                })
            }
        }
    }

    pub fn bearer_token(&self) -> &str {
        match self {
            Self::ApiKey { api_key } | Self::PublisherKey { api_key, .. } => api_key,
            Self::OAuth { access_token, .. } => access_token,
        }
    }

    pub fn publisher_id(&self) -> Option<&str> {
        match self {
            Self::PublisherKey { publisher_id, .. } => Some(publisher_id),
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey { .. } => f.write_str("ApiKey { api_key: *** }"),
            Self::PublisherKey { publisher_id, .. } => f
                .debug_struct("PublisherKey")
                .field("publisher_id", publisher_id)
                .field("api_key", &"***")
                .finish(),
            Self::OAuth { client_id, .. } => f
                .debug_struct("OAuth")
                .field("client_id", client_id)
                .field("client_secret", &"***")
                .field("access_token", &"***")
                .finish(),
        }
    }
}

/// Complete credential sets found at startup, keyed by platform id.
#[derive(Debug, Clone, Default)]
pub struct PlatformCredentials {
    sets: HashMap<String, Credentials>,
}

impl PlatformCredentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// A platform is included only when every one of its variables is set and non-blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut sets = HashMap::new();
        for spec in PLATFORMS.iter() {
            let values: Option<Vec<String>> = spec
                .credential_env
                .iter()
                .map(|key| {
                    lookup(*key)
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty())
                })
                .collect();

            if let Some(credentials) =
                values.and_then(|v| Credentials::from_values(spec.credential, v))
            {
                sets.insert(spec.id.to_string(), credentials);
            }
        }
        Self { sets }
    }

    pub fn get(&self, platform_id: &str) -> Option<&Credentials> {
        self.sets.get(platform_id)
    }

    #[cfg(test)]
    pub fn with(mut self, platform_id: &str, credentials: Credentials) -> Self {
        self.sets.insert(platform_id.to_string(), credentials);
        self
    }
}
