//! Output adapters.
//!
//! A finished [`crate::models::Statement`] is printed as a text table and
//! exported to CSV.

mod export;
mod table;

pub use export::{DEFAULT_OUTPUT_CSV, statement_csv, write_csv};
pub use table::{STATEMENT_HEADERS, format_money, render_table};
