mod context;
mod error;
mod source;

pub use context::AppContext;
pub use error::{AppError, Result};
pub use source::SliceSource;
