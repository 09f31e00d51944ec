use std::sync::Arc;

use tokio::sync::OnceCell;

use sde_core::traits::SdeApi;
use sde_core::Error;

type Factory = Box<dyn Fn() -> Result<Arc<dyn SdeApi>, Error> + Send + Sync>;

/// Shared API client, built on first use and reused afterwards.
///
/// Concurrent first calls run the factory once; the others wait for it. A
/// failed build leaves the handle empty so the next call tries again.
pub struct ApiHandle {
    cell: OnceCell<Arc<dyn SdeApi>>,
    factory: Factory,
}

impl ApiHandle {
    /// Build the client lazily with `factory`.
    pub fn lazy<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn SdeApi>, Error> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    /// Wrap an already constructed client.
    pub fn ready(api: Arc<dyn SdeApi>) -> Self {
        let fallback = Arc::clone(&api);
        Self {
            cell: OnceCell::new_with(Some(api)),
            factory: Box::new(move || Ok(Arc::clone(&fallback))),
        }
    }

    /// Get the client, building it if this is the first use.
    ///
    /// # Errors
    ///
    /// Returns whatever error the factory produced, unchanged.
    pub async fn get(&self) -> Result<Arc<dyn SdeApi>, Error> {
        let api = self
            .cell
            .get_or_try_init(|| async {
                tracing::info!("Initializing SD Elements API client");
                (self.factory)()
            })
            .await?;
        Ok(Arc::clone(api))
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}
