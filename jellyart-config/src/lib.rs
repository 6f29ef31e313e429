//! Connection settings for jellyart: the `connection.json` file, how it is
//! located, and the small parsers automation arguments go through.

pub mod connection;
pub mod error;
pub mod util;
pub mod validation;

pub use connection::{
    CONNECTION_FILE_ENV, ConnectionConfig, ConnectionSource,
    DEFAULT_CONNECTION_FILE, default_connection_file,
};
pub use error::ConfigLoadError;
pub use validation::{ConfigWarning, ConfigWarnings};
