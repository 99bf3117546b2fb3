use reqwest::Method;

use super::{ApiClient, ReportHtml, Result};

impl ApiClient {
    /// Rendered report markup. The backend owns sanitization of this content.
    pub async fn html_report(&self, scan_result_id: u64) -> Result<ReportHtml> {
        let path = format!("/api/scan/rapports/generer-html/{scan_result_id}");
        let request = self.request(Method::GET, &path)?;
        self.send_json(request).await
    }

    pub async fn pdf_report(&self, scan_result_id: u64) -> Result<Vec<u8>> {
        let path = format!("/api/scan/rapports/generer/{scan_result_id}");
        let request = self.request(Method::GET, &path)?;
        self.send_bytes(request).await
    }
}
