//! Plain-text rendering of the cap table, ledger and stats.

use std::fmt::Write;

use rlp_cap_table::CapTable;
use rlp_ledger::LedgerRecord;
use rlp_session::SessionSummary;
use rlp_types::Amount;

/// `₿ 1.2345` for bitcoin, `1.2345 sats` for anything else.
pub fn money(amount: Amount, unit: &str, decimals: usize) -> String {
    let value = amount.format_fixed(decimals);
    if unit.eq_ignore_ascii_case("BTC") {
        format!("₿ {value}")
    } else {
        format!("{value} {unit}")
    }
}

pub fn allocation_line(total_active_share: f64) -> String {
    format!("Total Allocation: {:.1}%", total_active_share * 100.0)
}

pub fn allocation_warning(total_active_share: f64) -> String {
    format!(
        "Allocation must equal 100%! Current: {}%",
        total_active_share * 100.0
    )
}

pub fn cap_table(table: &CapTable) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<10} {:<16} {:<16} {:>8}  {}",
        "#", "Role", "Name", "Wallet", "Share", "Status"
    );
    for (index, entry) in table.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<10} {:<16} {:<16} {:>8}  {}",
            index,
            entry.role,
            entry.name,
            entry.wallet.as_str(),
            entry.share.to_string(),
            entry.status
        );
    }
    let _ = writeln!(out, "{}", allocation_line(table.total_active_share()));
    out
}

pub fn ledger(records: &[&LedgerRecord], unit: &str) -> String {
    let mut out = String::new();
    let amount_header = format!("Amount ({unit})");
    let _ = writeln!(
        out,
        "{:<26}  {:<6}  {:<14}  {:<16}  {:>14}  {}",
        "Timestamp", "Type", "From", "To", amount_header, "Note"
    );
    for record in records {
        let _ = writeln!(
            out,
            "{:<26}  {:<6}  {:<14}  {:<16}  {:>14}  {}",
            record.timestamp.to_string(),
            record.kind.as_str(),
            record.from,
            record.to,
            record.amount.to_string(),
            record.note
        );
    }
    out
}

pub fn summary(summary: &SessionSummary, unit: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", allocation_line(summary.total_active_share));
    let _ = writeln!(
        out,
        "Stakeholders: {} ({} active)",
        summary.stakeholders, summary.active_stakeholders
    );
    let _ = writeln!(
        out,
        "Total Volume Processed: {}",
        money(summary.income_volume, unit, 4)
    );
    let _ = writeln!(
        out,
        "Total Paid Out: {}",
        money(summary.payout_volume, unit, 4)
    );
    let _ = writeln!(
        out,
        "Distributions: {} executed, {} refused ({} ledger records)",
        summary.distributions, summary.refused, summary.records
    );
    out
}

pub fn recipient_totals(totals: &[(String, Amount)], unit: &str) -> String {
    let mut out = String::new();
    for (name, total) in totals {
        let _ = writeln!(out, "  {:<16} {}", name, money(*total, unit, 8));
    }
    out
}
