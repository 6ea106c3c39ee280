//! Public contact form. Messages are relayed over SMTP, never stored.

use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use promostore_content::ContactMessage;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub async fn submit(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ContactRequest>,
) -> axum::response::Response {
    let Some(mailer) = services.mailer.as_ref() else {
        return errors::not_configured("contact mail");
    };

    let message = ContactMessage {
        from_name: body.name,
        from_email: body.email,
        subject: body.subject,
        body: body.body,
    };
    if let Err(e) = message.validate() {
        return errors::domain_error_to_response(e);
    }

    match mailer.send_contact(&message).await {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(e) => errors::mail_error_to_response(e),
    }
}
