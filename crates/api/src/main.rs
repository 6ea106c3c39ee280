use std::sync::Arc;

use promostore_api::app::{build_app, AppServices};
use promostore_infra::{PgStore, SmtpConfig, SmtpMailer, WebdavClient, WebdavConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    promostore_observability::init();

    let jwt_secret = std::env::var("ADMIN_JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("ADMIN_JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });

    let mut services = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let store = PgStore::connect(&url).await?;
            store.ensure_schema().await?;
            tracing::info!("using Postgres-backed stores");
            AppServices::postgres(store)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            AppServices::in_memory()
        }
    };

    if let Ok(base_url) = std::env::var("WEBDAV_URL") {
        let config = WebdavConfig {
            public_base_url: std::env::var("WEBDAV_PUBLIC_URL").unwrap_or_else(|_| base_url.clone()),
            base_url,
            username: std::env::var("WEBDAV_USER").unwrap_or_default(),
            password: std::env::var("WEBDAV_PASSWORD").unwrap_or_default(),
        };
        services = services.with_media(Arc::new(WebdavClient::new(config)));
    } else {
        tracing::warn!("WEBDAV_URL not set; media uploads disabled");
    }

    match (
        std::env::var("SMTP_HOST"),
        std::env::var("CONTACT_TO"),
        std::env::var("CONTACT_FROM"),
    ) {
        (Ok(host), Ok(to), Ok(from)) => {
            let config = SmtpConfig {
                host,
                username: std::env::var("SMTP_USER").unwrap_or_default(),
                password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
                to,
                from,
            };
            services = services.with_mailer(Arc::new(SmtpMailer::new(config)?));
        }
        _ => {
            tracing::warn!("SMTP_HOST/CONTACT_TO/CONTACT_FROM not set; contact mail disabled");
        }
    }

    let app = build_app(Arc::new(services), &jwt_secret);

    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
