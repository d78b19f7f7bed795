//! Line-oriented interactive session.
//!
//! Each line is one user action and runs to completion before the next is
//! read. Errors are printed and the shell carries on.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use rlp_cap_table::{StakeholderEdit, StakeholderEntry, Status};
use rlp_session::{Session, SessionError};
use rlp_types::{Clock, Share, WalletAddress};

use crate::render;

pub const DEFAULT_NOTE: &str = "Invoice #1024 - Consulting";

const HELP: &str = "\
commands:
  table                                  show the cap table
  add <role> <name> <wallet> <share>     append a stakeholder (share as 0.2 or 20%)
  remove <row>                           delete a row
  set <row> <field> <value>              field: role, name, wallet, share, status
  activate <row> | deactivate <row>      toggle participation
  pay <amount> [note]                    execute a distribution
  ledger                                 show the ledger, newest first
  stats                                  show protocol stats
  export [path]                          write the ledger as CSV
  help                                   this text
  quit                                   leave the shell
quote arguments containing spaces: add Reserve \"Company Vault\" bc1q...Vault 60%";

/// Split a line on whitespace, keeping double-quoted runs together.
pub fn tokenize(line: &str) -> Result<Vec<String>, anyhow::Error> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if pending {
                    tokens.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if in_quotes {
        bail!("unterminated quote");
    }
    if pending {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parse `0.2`, `20%` or `20.5%` into a share.
pub fn parse_share(s: &str) -> Result<Share, anyhow::Error> {
    let share = match s.strip_suffix('%') {
        Some(percent) => {
            let value: f64 = percent.trim().parse().context("invalid percentage")?;
            Share::from_percent(value)?
        }
        None => {
            let value: f64 = s.parse().context("invalid share")?;
            Share::new(value)?
        }
    };
    Ok(share)
}

fn parse_row(s: Option<&String>) -> Result<usize, anyhow::Error> {
    let s = s.ok_or_else(|| anyhow!("missing row number"))?;
    s.parse().with_context(|| format!("invalid row number: {s}"))
}

/// What the shell should do after a command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Shell<C: Clock> {
    session: Session<C>,
}

impl<C: Clock> Shell<C> {
    pub fn new(session: Session<C>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    /// Read commands until EOF or `quit`.
    ///
    /// A line that is not valid UTF-8 is reported and skipped; only I/O
    /// failures on `input` or `out` end the loop early.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> anyhow::Result<()> {
        writeln!(out, "RLP simulator shell. Type `help` for commands.")?;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let result = match std::str::from_utf8(&buf) {
                Ok(line) => self.execute(line.trim_end_matches(['\n', '\r']), &mut out),
                Err(_) => Err(anyhow!("input line is not valid UTF-8")),
            };
            match result {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => writeln!(out, "error: {e:#}")?,
            }
        }
        out.flush()?;
        Ok(())
    }

    fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> anyhow::Result<Flow> {
        let tokens = tokenize(line)?;
        let Some((command, args)) = tokens.split_first() else {
            return Ok(Flow::Continue);
        };
        let unit = self.session.config().unit.clone();

        match command.as_str() {
            "help" => writeln!(out, "{HELP}")?,
            "quit" | "exit" => return Ok(Flow::Quit),
            "table" => write!(out, "{}", render::cap_table(self.session.cap_table()))?,
            "add" => {
                let [role, name, wallet, share] = args else {
                    bail!("usage: add <role> <name> <wallet> <share>");
                };
                let entry = StakeholderEntry::new(
                    role.as_str(),
                    name.as_str(),
                    wallet.as_str(),
                    parse_share(share)?,
                );
                let row = self.session.add_stakeholder(entry);
                writeln!(out, "added row {row}")?;
                self.allocation_status(out)?;
            }
            "remove" => {
                let row = parse_row(args.first())?;
                let removed = self.session.remove_stakeholder(row)?;
                writeln!(out, "removed {}", removed.name)?;
                self.allocation_status(out)?;
            }
            "set" => {
                let [row, field, value] = args else {
                    bail!("usage: set <row> <field> <value>");
                };
                let row = parse_row(Some(row))?;
                let edit = match field.as_str() {
                    "role" => StakeholderEdit {
                        role: Some(value.clone()),
                        ..Default::default()
                    },
                    "name" => StakeholderEdit {
                        name: Some(value.clone()),
                        ..Default::default()
                    },
                    "wallet" => StakeholderEdit {
                        wallet: Some(WalletAddress::new(value.as_str())),
                        ..Default::default()
                    },
                    "share" => StakeholderEdit {
                        share: Some(parse_share(value)?),
                        ..Default::default()
                    },
                    "status" => StakeholderEdit {
                        status: Some(value.parse::<Status>()?),
                        ..Default::default()
                    },
                    other => bail!("unknown field: {other}"),
                };
                self.session.update_stakeholder(row, edit)?;
                self.allocation_status(out)?;
            }
            "activate" | "deactivate" => {
                let row = parse_row(args.first())?;
                let status = if command == "activate" {
                    Status::Active
                } else {
                    Status::Inactive
                };
                self.session.set_status(row, status)?;
                self.allocation_status(out)?;
            }
            "pay" => {
                let (amount, note) = args
                    .split_first()
                    .ok_or_else(|| anyhow!("usage: pay <amount> [note]"))?;
                let amount = crate::parse_amount(amount).map_err(|e| anyhow!(e))?;
                let note = if note.is_empty() {
                    DEFAULT_NOTE.to_string()
                } else {
                    note.join(" ")
                };
                match self.session.execute_distribution(amount, &note) {
                    Ok(receipt) => writeln!(out, "{}", receipt.describe(&unit))?,
                    Err(SessionError::InvalidAllocation { .. }) => {
                        writeln!(out, "Cannot execute: Cap Table Logic Error (Shares != 100%)")?
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            "ledger" => {
                let view = self.session.ledger().newest_first();
                write!(out, "{}", render::ledger(&view, &unit))?;
            }
            "stats" => {
                write!(out, "{}", render::summary(&self.session.summary(), &unit))?;
                write!(
                    out,
                    "{}",
                    render::recipient_totals(&self.session.ledger().totals_by_recipient(), &unit)
                )?;
            }
            "export" => {
                let path = self.session.export_csv(args.first().map(Path::new))?;
                writeln!(out, "exported {} records to {}", self.session.ledger().len(), path.display())?;
            }
            other => bail!("unknown command: {other} (try `help`)"),
        }
        Ok(Flow::Continue)
    }

    fn allocation_status<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        let total = self.session.total_active_share();
        if self.session.allocation_ok() {
            writeln!(out, "{}", render::allocation_line(total))?;
        } else {
            writeln!(out, "{}", render::allocation_warning(total))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rlp_nullables::NullClock;
    use rlp_session::SessionConfig;
    use rlp_types::Amount;
    use std::io::Cursor;

    fn run(script: &str) -> (String, Shell<NullClock>) {
        let session = Session::with_clock(SessionConfig::default(), NullClock::at_secs(1_700_000_000));
        let mut shell = Shell::new(session);
        let mut out = Vec::new();
        shell.run(Cursor::new(script), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), shell)
    }

    #[test]
    fn tokenize_respects_quotes() {
        assert_eq!(
            tokenize(r#"add Reserve "Company Vault" bc1q 60%"#).unwrap(),
            ["add", "Reserve", "Company Vault", "bc1q", "60%"]
        );
        assert_eq!(tokenize(r#"pay 1 """#).unwrap(), ["pay", "1", ""]);
        assert!(tokenize(r#"add "open"#).is_err());
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn parse_share_accepts_fraction_and_percent() {
        assert_eq!(parse_share("0.25").unwrap(), Share::new(0.25).unwrap());
        assert_eq!(parse_share("25%").unwrap(), Share::new(0.25).unwrap());
        assert!(parse_share("150%").is_err());
        assert!(parse_share("abc").is_err());
    }

    #[test]
    fn pay_records_distribution() {
        let (out, shell) = run("pay 2.5 Invoice #7\nquit\npay 1\n");
        assert!(out.contains("Successfully bridged 2.5 BTC to 4 wallets!"));
        let ledger = shell.session().ledger();
        assert_eq!(ledger.len(), 5);
        assert_eq!(ledger.records()[0].note, "Invoice #7");
        assert_eq!(ledger.income_volume(), Amount::new(2.5));
    }

    #[test]
    fn pay_without_note_uses_default_reference() {
        let (_, shell) = run("pay 1\n");
        assert_eq!(shell.session().ledger().records()[0].note, DEFAULT_NOTE);
    }

    #[test]
    fn deactivation_blocks_payment() {
        let (out, shell) = run("deactivate 2\npay 1\n");
        assert!(out.contains("Allocation must equal 100%! Current: 95"));
        assert!(out.contains("Cannot execute: Cap Table Logic Error (Shares != 100%)"));
        assert!(shell.session().ledger().is_empty());
    }

    #[test]
    fn rebalance_then_pay() {
        let (out, shell) = run("remove 2\nset 2 share 65%\npay 1\n");
        assert!(out.contains("removed Charlie"));
        assert!(out.contains("Total Allocation: 100.0%"));
        assert_eq!(shell.session().ledger().len(), 4);
    }

    #[test]
    fn bad_input_reports_error_and_continues() {
        let (out, shell) = run("frobnicate\nremove 12\npay -\nset 0 status paused\npay 1\n");
        assert_eq!(out.matches("error:").count(), 4);
        assert_eq!(shell.session().ledger().len(), 5);
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let session = Session::with_clock(SessionConfig::default(), NullClock::at_secs(1_700_000_000));
        let mut shell = Shell::new(session);
        let mut out = Vec::new();
        shell
            .run(Cursor::new(&b"pay 1\n\xff\xfe\npay 1\r\n"[..]), &mut out)
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("error: input line is not valid UTF-8"));
        assert_eq!(out.matches("Successfully bridged").count(), 2);
        assert_eq!(shell.session().ledger().len(), 10);
    }

    #[test]
    fn export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let script = format!("pay 1\nexport \"{}\"\n", path.display());
        let (out, _) = run(&script);
        assert!(out.contains("exported 5 records"));
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("Timestamp,Type"));
    }

    #[test]
    fn stats_and_ledger_render() {
        let (out, _) = run("pay 1\nledger\nstats\n");
        assert!(out.contains("Amount (BTC)"));
        assert!(out.contains("Total Volume Processed: ₿ 1.0000"));
        assert!(out.contains("Company Vault"));
    }
}
