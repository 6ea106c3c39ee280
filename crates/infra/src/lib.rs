//! `promostore-infra` — adapters around the outside world.
//!
//! Storage (in-memory for tests/dev, Postgres for prod), the WebDAV media
//! client, and the SMTP mailer. Domain rules live in the domain crates; this
//! crate is responsible for making every multi-row operation atomic.

pub mod files;
pub mod mailer;
pub mod store;

pub use files::{InMemoryMediaStore, MediaError, MediaStore, WebdavClient, WebdavConfig};
pub use mailer::{MailError, Mailer, RecordingMailer, SmtpConfig, SmtpMailer};
pub use store::{
    AllowlistStore, CatalogStore, ContentStore, MemoryStore, PgStore, SellOutcome, StoreError,
};
