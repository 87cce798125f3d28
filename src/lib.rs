// Shrinkray - on-demand image resizing library

pub mod config;
pub mod dimensions;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod proxy;
pub mod request;
pub mod resizer;
pub mod response;
pub mod storage;
