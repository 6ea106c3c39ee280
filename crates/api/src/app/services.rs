use std::sync::Arc;

use promostore_infra::{
    AllowlistStore, CatalogStore, ContentStore, InMemoryMediaStore, Mailer, MediaStore,
    MemoryStore, PgStore,
};

/// Backing services shared by every handler via `Extension<Arc<AppServices>>`.
///
/// Media and mail are optional: without WebDAV/SMTP configuration the
/// corresponding endpoints answer 503 instead of the process failing to start.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<dyn CatalogStore>,
    pub content: Arc<dyn ContentStore>,
    pub allowlist: Arc<dyn AllowlistStore>,
    pub media: Option<Arc<dyn MediaStore>>,
    pub mailer: Option<Arc<dyn Mailer>>,
}

impl AppServices {
    /// In-memory wiring (dev/test). Media is backed by a map; mail is absent
    /// unless added with [`AppServices::with_mailer`].
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            catalog: store.clone(),
            content: store.clone(),
            allowlist: store,
            media: Some(Arc::new(InMemoryMediaStore::new())),
            mailer: None,
        }
    }

    /// Postgres wiring. Media and mail stay `None` unless configured.
    pub fn postgres(store: PgStore) -> Self {
        let store = Arc::new(store);
        Self {
            catalog: store.clone(),
            content: store.clone(),
            allowlist: store,
            media: None,
            mailer: None,
        }
    }

    pub fn with_media(mut self, media: Arc<dyn MediaStore>) -> Self {
        self.media = Some(media);
        self
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }
}
