// =============================================================================
// Report rendering — console table and CSV export
// =============================================================================
//
// Both surfaces print from the same already-rounded `MatchRecord` values, so
// the table and the CSV always agree digit for digit. The CSV shape is one
// header row plus one row per match; none of the numeric columns can contain
// a comma, so a plain split is a complete parser.

use anyhow::{bail, Context, Result};

use crate::types::MatchRecord;

const CSV_HEADER: &str = "Ticker,Close,RSI,RelVol,ATR%,ADX";

/// Render matches as an aligned console table.
///
/// # Edge cases
/// - An empty match list renders the header plus a "no setups" line.
pub fn render_table(matches: &[MatchRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<8} {:>10} {:>6} {:>7} {:>6} {:>6}\n",
        "Ticker", "Close", "RSI", "RelVol", "ATR%", "ADX"
    ));
    out.push_str(&"-".repeat(48));
    out.push('\n');

    if matches.is_empty() {
        out.push_str("no setups found\n");
        return out;
    }

    for m in matches {
        out.push_str(&format!(
            "{:<8} {:>10.2} {:>6.1} {:>7.2} {:>6.2} {:>6.1}\n",
            m.ticker, m.close, m.rsi, m.rel_vol, m.atr_pct, m.adx
        ));
    }
    out
}

/// Serialise matches to CSV (header + one row per match).
pub fn to_csv(matches: &[MatchRecord]) -> String {
    let mut out = String::with_capacity(64 * (matches.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');
    for m in matches {
        out.push_str(&format!(
            "{},{:.2},{:.1},{:.2},{:.2},{:.1}\n",
            m.ticker, m.close, m.rsi, m.rel_vol, m.atr_pct, m.adx
        ));
    }
    out
}

/// Parse CSV produced by [`to_csv`] back into records.
///
/// # Edge cases
/// - A header-only document parses to an empty list.
/// - Blank trailing lines are ignored.
pub fn from_csv(input: &str) -> Result<Vec<MatchRecord>> {
    let mut lines = input.lines();

    let header = lines.next().context("CSV input is empty")?;
    if header.trim() != CSV_HEADER {
        bail!("unexpected CSV header: {header:?}");
    }

    let mut records = Vec::new();
    for (lineno, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 6 {
            bail!(
                "CSV line {} has {} fields, expected 6",
                lineno + 2,
                fields.len()
            );
        }

        let parse = |i: usize, name: &str| -> Result<f64> {
            fields[i]
                .parse::<f64>()
                .with_context(|| format!("bad {name} value {:?} on CSV line {}", fields[i], lineno + 2))
        };

        records.push(MatchRecord {
            ticker: fields[0].to_string(),
            close: parse(1, "Close")?,
            rsi: parse(2, "RSI")?,
            rel_vol: parse(3, "RelVol")?,
            atr_pct: parse(4, "ATR%")?,
            adx: parse(5, "ADX")?,
        });
    }

    Ok(records)
}
