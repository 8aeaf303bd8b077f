pub mod error;
pub mod multipart_form;

pub use error::{ApiError, ApiResult};
pub use multipart_form::MultipartForm;
