use std::sync::Arc;

use anyhow::anyhow;
use tracing::error;

use kotoba_db::DirectoryStore;
use kotoba_translate::Translator;

use crate::error::DiaryError;
use crate::identity::IdentityProvider;

/// Handles to every external collaborator. Cheap to clone; passed into each
/// operation instead of living in globals.
#[derive(Clone)]
pub struct Context {
    pub store: Arc<dyn DirectoryStore>,
    pub translator: Arc<dyn Translator>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl Context {
    pub fn new(
        store: Arc<dyn DirectoryStore>,
        translator: Arc<dyn Translator>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            store,
            translator,
            identity,
        }
    }

    /// Run a blocking store call off the async runtime. Any store error
    /// surfaces as [`DiaryError::StoreUnavailable`].
    pub async fn with_store<F, T>(&self, f: F) -> Result<T, DiaryError>
    where
        F: FnOnce(&dyn DirectoryStore) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                DiaryError::StoreUnavailable(anyhow!("store task failed: {}", e))
            })?
            .map_err(DiaryError::StoreUnavailable)
    }
}
