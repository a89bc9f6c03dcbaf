use error::CoreError;

pub mod diagnostics;
pub mod error;
pub mod name;
pub mod package;
pub mod resolve;
pub mod version;

pub type CoreResult<T> = std::result::Result<T, CoreError>;
