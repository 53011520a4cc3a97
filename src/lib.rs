pub mod config;
pub mod core;
pub mod domain;
pub mod drivers;
pub mod storage;
pub mod supervisor;
pub mod utils;
pub mod worker;

pub use config::{CliConfig, WatchConfig};
pub use core::{FetchSummary, WatchEngine};
pub use domain::model::{HttpGetResponse, WatchUrl};
pub use domain::ports::{ConfigProvider, Driver, SnapshotStore};
pub use drivers::{init_drivers, DriverKind, DriverRepo};
pub use storage::LocalSnapshots;
pub use supervisor::{Supervisor, SupervisorHandle};
pub use utils::error::{Result, WatchError};
