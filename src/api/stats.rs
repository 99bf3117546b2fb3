use reqwest::Method;

use super::{ApiClient, Result, ScanStats};

impl ApiClient {
    pub async fn stats(&self) -> Result<ScanStats> {
        let request = self.request(Method::GET, "/api/scan/stats")?;
        self.send_json(request).await
    }
}
