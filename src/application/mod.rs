pub mod error;
pub mod operations;
pub mod pagination;
pub mod response;
pub mod task_service;

pub use error::*;
pub use operations::*;
pub use pagination::*;
pub use response::*;
pub use task_service::*;
