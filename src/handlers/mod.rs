mod health;
mod multipart;
mod quotes;
mod solar_analysis;
mod wizard;

pub use health::health_check;
pub use multipart::{DOCUMENT_FIELD_PREFIX, MultipartForm};
pub use quotes::{get_analysis, get_quote, list_quotes, results_page};
pub use solar_analysis::solar_analysis;
pub use wizard::{
    ADDRESS_PAGE, PERSONAL_PAGE, UPLOAD_PAGE, personal_page, submit_address, submit_personal_info,
    submit_upload, thank_you_page, upload_page,
};
