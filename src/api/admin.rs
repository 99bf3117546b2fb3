use reqwest::Method;
use tracing::info;

use super::{AdminUser, ApiClient, Result, ScanResult, ScanResultWire, convert_scans};

impl ApiClient {
    pub async fn list_users(&self) -> Result<Vec<AdminUser>> {
        let request = self.request(Method::GET, "/api/admin/users")?;
        self.send_json(request).await
    }

    pub async fn user_scans(&self, user_id: u64) -> Result<Vec<ScanResult>> {
        let path = format!("/api/admin/users/{user_id}/scans");
        let request = self.request(Method::GET, &path)?;
        let wire: Vec<ScanResultWire> = self.send_json(request).await?;
        convert_scans(wire)
    }

    pub async fn delete_user(&self, user_id: u64) -> Result<()> {
        let path = format!("/api/admin/users/{user_id}");
        let request = self.request(Method::DELETE, &path)?;
        self.send_empty(request).await?;

        info!(user = user_id, "user deleted");

        Ok(())
    }
}
