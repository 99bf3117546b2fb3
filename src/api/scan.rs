use reqwest::Method;

use super::{
    ApiClient, Result, ScanProgress, ScanProgressWire, ScanResult, ScanResultWire,
    StartScanRequest, StartScanResponse, convert_scans,
};

impl ApiClient {
    /// Scans owned by the current session, in backend order.
    pub async fn list_my_scans(&self) -> Result<Vec<ScanResult>> {
        let request = self.request(Method::GET, "/api/scan/user/scans")?;
        let wire: Vec<ScanResultWire> = self.send_json(request).await?;
        convert_scans(wire)
    }

    pub async fn start_scan(&self, url: &str) -> Result<StartScanResponse> {
        let request = self
            .request(Method::POST, "/api/scan/start")?
            .json(&StartScanRequest {
                url: url.to_string(),
            });

        self.send_json(request).await
    }

    pub async fn scan_progress(&self, scan_result_id: u64) -> Result<ScanProgress> {
        let path = format!("/api/scan/progress/{scan_result_id}");
        let request = self.request(Method::GET, &path)?;
        let wire: ScanProgressWire = self.send_json(request).await?;
        ScanProgress::try_from(wire)
    }
}
