use crate::adapters::http::HttpFetcher;
use crate::adapters::images::ResizingImageProcessor;
use crate::core::extractor::Extractor;
use crate::domain::model::{BillionaireRecord, LoadReport, TransformResult};
use crate::domain::ports::{ConfigProvider, ImageProcessor, PageFetcher, Pipeline, RecordSink};
use crate::utils::error::Result;
use std::sync::Arc;

/// Fetch → extract → format/resize → sink, configured by a single [`ConfigProvider`].
pub struct ScrapePipeline<C: ConfigProvider> {
    pub(crate) config: C,
    pub(crate) fetcher: Arc<dyn PageFetcher>,
    pub(crate) images: Option<Box<dyn ImageProcessor>>,
    pub(crate) sink: Box<dyn RecordSink>,
}

impl<C: ConfigProvider> ScrapePipeline<C> {
    pub fn new(
        config: C,
        fetcher: Arc<dyn PageFetcher>,
        images: Option<Box<dyn ImageProcessor>>,
        sink: Box<dyn RecordSink>,
    ) -> Self {
        Self {
            config,
            fetcher,
            images,
            sink,
        }
    }

    /// Wires the HTTP fetcher and, when enabled, the image resizer from the configuration.
    pub fn from_config(config: C, sink: Box<dyn RecordSink>) -> Result<Self> {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::from_config(&config)?);
        let images = config.image_settings().map(|settings| {
            Box::new(ResizingImageProcessor::new(Arc::clone(&fetcher), settings))
                as Box<dyn ImageProcessor>
        });
        Ok(Self::new(config, fetcher, images, sink))
    }
}

#[async_trait::async_trait]
impl<C: ConfigProvider> Pipeline for ScrapePipeline<C> {
    async fn extract(&self) -> Result<Vec<BillionaireRecord>> {
        let url = self.config.page_url();
        tracing::info!("Fetching billionaires page: {}", url);
        let html = self.fetcher.fetch_text(url).await?;
        tracing::debug!("Fetched {} bytes of HTML", html.len());

        let extractor = Extractor::new(&self.config.selectors())?;
        let extraction = extractor.extract(&html, self.config.row_limit());

        for skip in &extraction.skipped {
            tracing::debug!("Skipping row {}: {}", skip.index, skip.reason);
        }
        tracing::info!(
            "Read {} rows: {} records, {} skipped",
            extraction.rows_seen,
            extraction.records.len(),
            extraction.skipped.len()
        );

        Ok(extraction.records)
    }

    async fn transform(&self, data: Vec<BillionaireRecord>) -> Result<TransformResult> {
        let format = self.config.net_worth_format();
        let mut result = TransformResult::default();

        if let Some(images) = &self.images {
            images.prepare().await?;
        }

        for mut record in data {
            record.net_worth = format.apply(&record.net_worth);

            if let Some(images) = &self.images {
                if !record.image_reference.is_empty() {
                    let local = images.process(&record.name, &record.image_reference).await;
                    if local.is_empty() {
                        result.images_failed += 1;
                    } else {
                        result.images_saved += 1;
                    }
                    record.image_reference = local;
                }
            }

            result.records.push(record);
        }

        if self.images.is_some() {
            tracing::info!(
                "Images: {} saved, {} failed",
                result.images_saved,
                result.images_failed
            );
        }

        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<LoadReport> {
        if result.records.is_empty() {
            tracing::warn!("No records to load; leaving {} untouched", self.sink.destination());
            return Ok(LoadReport::new(self.sink.destination(), 0, 0));
        }

        tracing::debug!("Loading {} records into {}", result.records.len(), self.sink.destination());
        self.sink.write(&result.records).await
    }
}
