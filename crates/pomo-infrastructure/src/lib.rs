pub mod config_service;
pub mod logging;
pub mod paths;
pub mod sound;
pub mod storage;
pub mod ticker;

pub use crate::config_service::AppConfig;
pub use crate::paths::PomoPaths;
pub use crate::sound::TerminalBell;
pub use crate::storage::FileKeyValueStore;
pub use crate::ticker::TokioTicker;
