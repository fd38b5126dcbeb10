pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;

pub use error::{ShrinkError, ShrinkResult, StoreError};
pub use validation::validate_settings;
pub use formats::{download_name, numbered_name, DOWNLOAD_PREFIX, OUTPUT_MIME};
pub use fs::{extract_filename, read_input, write_artifact};
