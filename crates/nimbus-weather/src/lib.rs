//! Current-conditions service for Nimbus
//!
//! Fetches weather for a city from the upstream provider, normalizes and
//! localizes it, and keeps finished records in a short-lived cache.

pub mod cache;
pub mod compass;
pub mod error;
pub mod locale;
pub mod provider;
pub mod service;
pub mod types;

pub use cache::{cache_key, MemoryRecordCache, RecordCache};
pub use compass::{classify, CompassPoint, NO_BEARING};
pub use error::{FailureResponse, FetchError};
pub use locale::{is_language_tag, Catalog, LocaleResolver, Translator};
pub use nimbus_core::Units;
pub use provider::WeatherProvider;
pub use service::{build_record, Localization, WeatherService};
pub use types::*;
