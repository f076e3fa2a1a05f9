pub mod core;
pub mod dataset;
pub mod download;
pub mod observability;
pub mod persistence;

pub use dataset::{LoadOptions, Table, load_delimited, load_named_dataset};
pub use download::{Downloader, download_file};
pub use persistence::Database;
