// Object-store archive
// Same three artifacts as the local archive, written as HTTP PUTs against an
// S3-compatible bucket gateway, one key prefix per run.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use backend_domain::entities::AnalysisRun;
use backend_domain::ports::ArchiveStore;

pub struct BucketArchive {
    client: Client,
    endpoint: String,
    bucket: String,
    token: Option<String>,
}

impl BucketArchive {
    pub fn new(
        endpoint: String,
        bucket: String,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket,
            token,
        })
    }

    fn object_url(&self, folder: &str, name: &str) -> String {
        format!("{}/{}/{}/{}", self.endpoint, self.bucket, folder, name)
    }

    async fn put_object(&self, url: &str, content_type: &str, body: String) -> Result<()> {
        let mut request = self
            .client
            .put(url)
            .header("Content-Type", content_type)
            .body(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("put {url}"))?;
        if !response.status().is_success() {
            bail!("object store responded {} for {url}", response.status());
        }
        Ok(())
    }
}

#[async_trait]
impl ArchiveStore for BucketArchive {
    async fn persist_run(&self, run: &AnalysisRun) -> Result<()> {
        let csv_url = self.object_url(&run.folder_name, &run.metadata.original_filename);
        self.put_object(&csv_url, "text/csv", run.table.to_csv()?)
            .await?;

        let analysis_url = self.object_url(&run.folder_name, "analysis.json");
        self.put_object(
            &analysis_url,
            "application/json",
            serde_json::to_string_pretty(&run.analysis)?,
        )
        .await?;

        let metadata_url = self.object_url(&run.folder_name, "metadata.json");
        self.put_object(
            &metadata_url,
            "application/json",
            serde_json::to_string_pretty(&run.metadata)?,
        )
        .await?;

        Ok(())
    }

    fn mode(&self) -> &'static str {
        "object-store"
    }
}
