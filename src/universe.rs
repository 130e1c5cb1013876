// =============================================================================
// Ticker universe — which symbols a scan covers
// =============================================================================
//
// The default universe is a fixed S&P 100 constituent list compiled into the
// binary. It is deliberately NOT fetched from a live listings page at scan
// time: a scrape would make scan results depend on an uncontrolled,
// unversioned external source. Anyone wanting a different universe supplies
// a custom comma-delimited list instead.

/// Fixed S&P 100 constituent list (large-cap preset).
pub const SP100: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "GOOG", "AMZN", "NVDA", "META", "TSLA", "BRK-B", "JPM",
    "UNH", "V", "MA", "LLY", "HD", "PG", "JNJ", "XOM", "AVGO", "MRK", "ABBV", "CVX",
    "KO", "PEP", "COST", "ADBE", "TMO", "CRM", "AMD", "NFLX", "ACN", "LIN", "MCD",
    "ABT", "CSCO", "DIS", "TMUS", "WFC", "TXN", "QCOM", "AMGN", "INTU", "NOW",
    "IBM", "PM", "UNP", "HON", "GE", "CAT", "RTX", "NEE", "GS", "SBUX", "BKNG",
    "MDT", "LMT", "GILD", "ISRG", "SPGI", "BMY", "ELV", "SYK", "ADP", "AXP", "T",
    "VRTX", "REGN", "PGR", "PLD", "BLK", "CB", "AMT", "SCHW", "CI", "DE", "MO",
    "BA", "MDLZ", "MMC", "KLAC", "SO", "DUK", "ZTS", "ICE", "SHW", "ITW", "CL",
    "LRCX", "BSX", "CME", "TGT", "EOG", "BDX", "APH", "PNC", "EMR", "FDX", "MSI",
    "NSC", "HUM", "ANET", "CSX", "WM", "ORLY", "MCO", "ECL", "AZO",
];

/// Parse a comma-delimited free-text ticker list: trim whitespace, uppercase,
/// drop empty entries. Input order is preserved.
pub fn parse_ticker_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Where the ticker list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickerUniverse {
    /// The compiled-in S&P 100 preset.
    Sp100,
    /// A caller-supplied list (already normalized).
    Custom(Vec<String>),
}

impl TickerUniverse {
    /// Materialize the symbol list for scanning.
    pub fn tickers(&self) -> Vec<String> {
        match self {
            Self::Sp100 => SP100.iter().map(|s| s.to_string()).collect(),
            Self::Custom(list) => list.clone(),
        }
    }
}
