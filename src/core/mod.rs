//! Core converter logic and abstractions

pub mod config;
pub mod converter;
pub mod i18n;
pub mod loader;
pub mod log;
pub mod rates;
pub mod session;

// Re-export main types for cleaner imports
pub use converter::{Conversion, ConversionSkipped, available_currencies, convert};
pub use i18n::Language;
pub use loader::{LoadFailure, LoadState};
pub use rates::{RateProvider, RateSnapshot, RateTable, UpdateWindow};
pub use session::ConverterSession;
