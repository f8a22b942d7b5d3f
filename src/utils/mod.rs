pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;

pub use error::{ConfigError, ConverterError, ConverterResult};
pub use validation::validate_options;
pub use formats::{
    ImageFormat,
    file_stem,
    format_kb,
    is_image_media_type,
    media_type_from_name,
    output_file_name,
};
pub use fs::{extract_filename, read_input, write_output};
