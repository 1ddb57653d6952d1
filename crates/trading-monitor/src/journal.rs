//! Run journal rendering.

use trading_executor::RunReport;

const RULE: &str = "═══════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────";

/// Render the ordered outcome lines of a run with a short summary.
pub fn render_journal(report: &RunReport) -> String {
    let mut s = String::new();

    s.push_str(RULE);
    s.push('\n');
    s.push_str("                        RUN JOURNAL                        \n");
    s.push_str(RULE);
    s.push('\n');

    s.push_str(&format!("  Capital:     ${:.2}\n", report.capital));
    s.push_str(&format!("  Risk level:  {}\n", report.risk_level));
    s.push_str(THIN_RULE);
    s.push('\n');

    if report.entries.is_empty() {
        s.push_str("  No symbols processed\n");
    }
    for line in report.lines() {
        s.push_str("  ");
        s.push_str(&line);
        s.push('\n');
    }

    s.push_str(THIN_RULE);
    s.push('\n');
    s.push_str(&format!(
        "  {} symbols, {} orders submitted, {} errors\n",
        report.entries.len(),
        report.orders_submitted(),
        report.errors()
    ));

    s
}
