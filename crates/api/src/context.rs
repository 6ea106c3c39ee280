/// Admin context for a request (authenticated, allow-listed email).
///
/// Inserted by the auth middleware; present on every `/admin` route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminContext {
    email: String,
}

impl AdminContext {
    pub fn new(email: String) -> Self {
        Self { email }
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}
