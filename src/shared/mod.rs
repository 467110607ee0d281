pub mod errors;
pub mod ids;
pub mod logging;
pub mod time;

pub use errors::{EngineError, ResponseStatus};
pub use logging::EventLog;
