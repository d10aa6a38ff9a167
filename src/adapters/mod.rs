// Adapters layer: concrete implementations of the domain ports.

pub mod http;
pub mod images;
pub mod sink;
pub mod storage;
