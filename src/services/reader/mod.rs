//! Image OCR reader service.
//!
//! Reads one image, a list of images, or a whole directory and returns one
//! [`crate::models::Document`] per image.
//!
//! # Example
//!
//! ```ignore
//! use ocrdex::services::reader::{ImageOcrReader, ReaderConfig};
//!
//! let reader = ImageOcrReader::from_config(ReaderConfig::new().with_language("eng"))?;
//!
//! let docs = reader.load_data(["scan-1.png", "scan-2.jpg"], None).await?;
//! let more = reader.load_data_from_dir("./images", true, None).await?;
//! ```

pub mod config;
pub mod error;
pub mod service;

pub use config::{ConfigError, ReaderConfig, DEFAULT_IMAGE_EXTENSIONS, PSM_AUTO_OSD};
pub use error::ReaderError;
pub use service::{ImageOcrReader, ReaderResult};
