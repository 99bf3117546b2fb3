use reqwest::Method;
use tracing::info;

use super::{ApiClient, AuthResponseWire, LoginRequest, RegisterRequest, Result, Session};

impl ApiClient {
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Session> {
        let request = self
            .request(Method::POST, "/api/auth/login")?
            .json(credentials);

        let wire: AuthResponseWire = self.send_json(request).await?;
        let session = Session::try_from(wire)?;

        info!(user = session.user.id, role = %session.user.role, "logged in");

        Ok(session)
    }

    pub async fn register(&self, payload: &RegisterRequest) -> Result<()> {
        let request = self
            .request(Method::POST, "/api/auth/register")?
            .json(payload);

        self.send_empty(request).await
    }
}
