pub mod error;
pub mod load;
pub mod paths;
pub mod save;
pub mod settings;

pub use error::ConfigError;
pub use load::{load_global_settings, load_settings};
pub use paths::{
    default_global_config_path, default_state_root_path, GLOBAL_SETTINGS_FILE_NAME,
    GLOBAL_STATE_DIR,
};
pub use save::{bootstrap_state_root, save_settings};
pub use settings::{
    default_commands, ArchiveSettings, Settings, DEFAULT_ARCHIVE_ID, DEFAULT_FRAMEWORK_VERSION,
};
