pub mod config;
pub mod convert;
pub mod discovery;
pub mod errors;
pub mod filters;
pub mod results;
pub mod rewrite;
pub mod run;

pub use config::ConvertConfig;
pub use convert::{AmountConversion, Conversion, CurrencyConverter};
pub use discovery::discover_files;
pub use errors::{ConvertError, ConvertResult};
pub use results::{FilePreview, RewriteResult, RewriteStatus, RunSummary};
pub use rewrite::{preview_file, rewrite_file, RewriteOptions};
pub use run::{convert, convert_files, preview};
