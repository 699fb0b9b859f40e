//! Terminal participant client for the planning poker server.

mod domain;
mod error;
mod formatter;
mod session;
mod ui;

pub use domain::{ClientCommand, parse_input};
pub use error::ClientError;
pub use formatter::MessageFormatter;
pub use session::run_client;
