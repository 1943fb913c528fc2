//! CSV export of a statement.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{Statement, StatementLine};

/// Default export location.
pub const DEFAULT_OUTPUT_CSV: &str = "output/final_table.csv";

#[derive(Serialize)]
struct CsvLine<'a> {
    owner_company: &'a str,
    month: &'a str,
    original_monthly_revenue: String,
    monthly_revenue_in_reference_currency: String,
    currency: &'a str,
    conversion_status: &'static str,
}

impl<'a> From<&'a StatementLine> for CsvLine<'a> {
    fn from(line: &'a StatementLine) -> Self {
        Self {
            owner_company: &line.owner_company,
            month: &line.month,
            original_monthly_revenue: line.original_monthly_revenue.to_string(),
            monthly_revenue_in_reference_currency: line.monthly_revenue_in_reference_currency.to_string(),
            currency: line.currency.as_deref().unwrap_or(""),
            conversion_status: line.conversion_status.as_str(),
        }
    }
}

/// Serializes the statement lines to CSV text.
///
/// Amounts are written at full precision. The header row is always present.
pub fn statement_csv(statement: &Statement) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record([
        "owner_company",
        "month",
        "original_monthly_revenue",
        "monthly_revenue_in_reference_currency",
        "currency",
        "conversion_status",
    ])?;
    for line in &statement.lines {
        writer.serialize(CsvLine::from(line))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes the statement as CSV to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`EngineError::ExportError`] if the directory or file cannot be
/// written.
pub fn write_csv(statement: &Statement, path: &Path) -> EngineResult<()> {
    let export_error = |message: String| EngineError::ExportError {
        path: path.display().to_string(),
        message,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| export_error(e.to_string()))?;
    }

    let content = statement_csv(statement).map_err(|e| export_error(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| export_error(e.to_string()))?;

    info!(
        path = %path.display(),
        lines = statement.lines.len(),
        "Exported statement to CSV"
    );
    Ok(())
}
