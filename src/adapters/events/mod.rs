//! Payment event handler adapters.
//!
//! - `LoggingEventHandler` - Logs each verified event and acknowledges it

mod logging_event_handler;

pub use logging_event_handler::LoggingEventHandler;
