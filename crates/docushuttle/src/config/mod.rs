pub mod dates;
pub mod filter;
pub mod loader;
pub mod paths;
pub mod schema;
pub mod validate;

pub use dates::{convert_date_format, parse_date, DateWindow};
pub use filter::FilterConfig;
pub use loader::{load_filter_config, load_settings, load_settings_from_str};
pub use schema::RunSettings;
pub use validate::{parse_prefixes, validate_email};
