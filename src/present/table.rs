//! psql-style text table.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Statement;

/// Column headers of the presentation contract.
pub const STATEMENT_HEADERS: [&str; 4] = [
    "owner_company",
    "month",
    "original_monthly_revenue",
    "monthly_revenue_in_reference_currency",
];

/// Formats a money amount with exactly two decimal places, half away from zero.
///
/// ```
/// use revenue_engine::present::format_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_money(Decimal::new(1106, 1)), "110.60");
/// assert_eq!(format_money(Decimal::new(12345, 3)), "12.35");
/// ```
pub fn format_money(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Renders the statement lines as a bordered text table.
///
/// Text columns are left-aligned and money columns right-aligned.
pub fn render_table(statement: &Statement) -> String {
    let rows: Vec<[String; 4]> = statement
        .lines
        .iter()
        .map(|line| {
            [
                line.owner_company.clone(),
                line.month.clone(),
                format_money(line.original_monthly_revenue),
                format_money(line.monthly_revenue_in_reference_currency),
            ]
        })
        .collect();

    let mut widths = STATEMENT_HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = |left: char, joint: char, right: char| {
        let segments: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        format!("{}{}{}\n", left, segments.join(joint.to_string().as_str()), right)
    };

    let mut out = border('+', '+', '+');
    out.push_str(&format_row(&STATEMENT_HEADERS, &widths, false));
    out.push_str(&border('|', '+', '|'));
    for row in &rows {
        out.push_str(&format_row(row, &widths, true));
    }
    out.push_str(&border('+', '+', '+'));
    out
}

fn format_row<S: AsRef<str>>(cells: &[S; 4], widths: &[usize; 4], numeric_right: bool) -> String {
    let mut out = String::from("|");
    for (index, (cell, width)) in cells.iter().zip(widths).enumerate() {
        let cell = cell.as_ref();
        if numeric_right && index >= 2 {
            out.push_str(&format!(" {:>width$} |", cell, width = width));
        } else {
            out.push_str(&format!(" {:<width$} |", cell, width = width));
        }
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConversionStatus, RunReport, StatementLine};
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn statement(lines: Vec<StatementLine>) -> Statement {
        Statement {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            engine_version: "test".to_string(),
            reference_currency: "GBP".to_string(),
            lines,
            report: RunReport::default(),
        }
    }

    fn line(company: &str, original: Decimal, reference: Decimal) -> StatementLine {
        StatementLine {
            owner_company: company.to_string(),
            month: "03".to_string(),
            original_monthly_revenue: original,
            monthly_revenue_in_reference_currency: reference,
            owner_company_country: "Usa".to_string(),
            currency: Some("USD".to_string()),
            month_start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            conversion_status: ConversionStatus::Converted,
        }
    }

    #[test]
    fn test_renders_bordered_table() {
        let table = render_table(&statement(vec![line("Acme", Decimal::from(140), Decimal::new(1106, 1))]));
        let rows: Vec<&str> = table.lines().collect();

        assert_eq!(rows.len(), 5);
        assert!(rows[0].starts_with("+---------------+-------+"));
        assert_eq!(
            rows[1],
            "| owner_company | month | original_monthly_revenue | monthly_revenue_in_reference_currency |"
        );
        assert!(rows[2].starts_with("|---------------+"));
        assert_eq!(
            rows[3],
            "| Acme          | 03    |                   140.00 |                                110.60 |"
        );
        assert_eq!(rows[0], rows[4]);
    }

    #[test]
    fn test_columns_widen_for_long_values() {
        let table = render_table(&statement(vec![line(
            "The Very Long Hotel Company Name",
            Decimal::from(1),
            Decimal::from(1),
        )]));
        let widths: Vec<usize> = table.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_empty_statement_renders_headers_only() {
        let table = render_table(&statement(vec![]));
        assert_eq!(table.lines().count(), 4);
    }

    #[test]
    fn test_format_money_rounds_half_away_from_zero() {
        assert_eq!(format_money(Decimal::new(125, 3)), "0.13");
        assert_eq!(format_money(Decimal::from(100)), "100.00");
    }
}
