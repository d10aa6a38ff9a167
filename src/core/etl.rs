use crate::core::{LoadReport, Pipeline};
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs the three stages in order; the first error ends the run.
    pub async fn run(&self) -> Result<LoadReport> {
        tracing::info!("Starting ETL process...");

        tracing::info!("Extracting data...");
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Extracted {} records", raw_data.len());

        tracing::info!("Transforming data...");
        let transformed_result = self.pipeline.transform(raw_data).await?;
        tracing::info!("Transformed {} records", transformed_result.records.len());

        tracing::info!("Loading data...");
        let report = self.pipeline.load(transformed_result).await?;
        tracing::info!("{}", report);

        Ok(report)
    }
}
