pub mod logging;
pub mod file_system;
pub mod version_control;

pub use logging::{Logger, LoggerTrait};
pub use file_system::{FileSystem, OsFileSystem};
pub use version_control::{CommandGateway, CommandOutcome, FileSystemGateway, VersionControlGateway};
