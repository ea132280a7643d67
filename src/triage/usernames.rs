use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use log::debug;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::github::GitHubClient;

/// In-memory login -> display-name cache.
///
/// Owned by the pipeline instance rather than living in process-wide state,
/// so report runs never leak entries into one another. Absent display names
/// are cached too: a login without a profile name is asked about once.
#[derive(Debug, Default)]
pub struct NameCache {
    entries: Mutex<HashMap<String, Option<String>>>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, or resolves it with `fetch` and
    /// caches the result.
    ///
    /// Concurrent callers may both run `fetch` for the same key, but only the
    /// first completed result is stored; the cache never ends up with
    /// duplicate entries for one login.
    pub async fn get_or_resolve<F, Fut>(&self, key: &str, fetch: F) -> Result<Option<String>>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<Option<String>>>,
    {
        if let Some(cached) = self.entries.lock().await.get(key) {
            return Ok(cached.clone());
        }

        let resolved = fetch(key.to_string()).await?;

        let mut entries = self.entries.lock().await;
        let value = entries
            .entry(key.to_string())
            .or_insert_with(|| resolved.clone());
        Ok(value.clone())
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

/// Resolves GitHub logins to display names through the user directory,
/// memoizing results for the lifetime of the report run.
#[derive(Debug)]
pub struct UserNameResolver {
    client: Arc<GitHubClient>,
    cache: NameCache,
}

impl UserNameResolver {
    pub fn new(client: Arc<GitHubClient>) -> Self {
        Self {
            client,
            cache: NameCache::new(),
        }
    }

    /// Display name for `login`, or `None` when the profile has no name or
    /// the login is unknown to the directory.
    ///
    /// Lookup misses are not failures: an unknown login degrades to an absent
    /// name so a single bad attribution never aborts the run.
    pub async fn resolve(&self, login: &str) -> Result<Option<String>> {
        let client = Arc::clone(&self.client);
        self.cache
            .get_or_resolve(login, |login| async move {
                match client.get_user(&login).await {
                    Ok(user) => Ok(user.name.filter(|name| !name.is_empty())),
                    Err(e) => {
                        debug!("Could not resolve user {login}: {e}");
                        Ok(None)
                    }
                }
            })
            .await
    }
}
