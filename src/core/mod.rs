pub mod engine;

pub use crate::domain::model::{HttpGetResponse, WatchUrl};
pub use crate::domain::ports::{ConfigProvider, Driver, SnapshotStore};
pub use crate::utils::error::Result;
pub use engine::{FetchSummary, WatchEngine};
