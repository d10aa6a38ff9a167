use crate::domain::model::{
    BillionaireRecord, ImageSettings, LoadReport, NetWorthFormat, RowSelectors, SinkSettings,
    TransformResult,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Human-readable location of `path`, used in reports.
    fn describe(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn page_url(&self) -> &str;
    fn user_agent(&self) -> &str;
    fn request_timeout_secs(&self) -> Option<u64>;
    fn row_limit(&self) -> Option<usize>;
    fn selectors(&self) -> RowSelectors;
    fn net_worth_format(&self) -> NetWorthFormat;
    /// `None` keeps remote image URLs untouched.
    fn image_settings(&self) -> Option<ImageSettings>;
    fn sink_settings(&self) -> Result<SinkSettings>;
}

/// Issues GET requests; anything but `200 OK` is an error.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait ImageProcessor: Send + Sync {
    /// Prepares the output location once per run.
    async fn prepare(&self) -> Result<()>;
    /// Returns the local path of the resized image, or an empty string on any failure.
    async fn process(&self, name: &str, url: &str) -> String;
}

#[async_trait]
pub trait RecordSink: Send + Sync {
    fn destination(&self) -> String;
    async fn write(&self, records: &[BillionaireRecord]) -> Result<LoadReport>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<BillionaireRecord>>;
    async fn transform(&self, data: Vec<BillionaireRecord>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<LoadReport>;
}
