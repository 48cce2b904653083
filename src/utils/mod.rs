// Gateway module for utils - follows the Train Station Pattern

mod errors;
mod logger;

pub use errors::SecretaryError;
pub use logger::{init_file_logger, init_logger};
