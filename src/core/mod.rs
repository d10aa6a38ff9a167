pub mod etl;
pub mod extractor;
pub mod pipeline;
pub mod schema_converter;
pub mod sql_literal;

pub use crate::domain::model::{BillionaireRecord, LoadReport, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, RecordSink, Storage};
pub use crate::utils::error::Result;
