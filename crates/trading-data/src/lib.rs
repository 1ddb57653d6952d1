//! Daily price-history sources.
//!
//! - [`YahooDataSource`]: Yahoo Finance chart API, no credentials needed
//! - [`AlpacaDataSource`]: Alpaca market-data API (IEX feed)
//! - [`CsvDataSource`]: a directory of `{SYMBOL}.csv` files for offline runs

mod alpaca;
mod csv_source;
mod yahoo;

pub use alpaca::AlpacaDataSource;
pub use csv_source::CsvDataSource;
pub use yahoo::YahooDataSource;
