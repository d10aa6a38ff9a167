pub use crate::app::pipelines::scrape_pipeline::ScrapePipeline;
