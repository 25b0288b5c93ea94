pub mod config;
pub mod keywords;
pub mod rank;
pub mod report;
pub mod scan;
pub mod similarity;

use colored::Colorize;

pub use config::{Config, ConfigError, DateSelection, EnrichConfig};
pub use rank::{QueryMatches, RankedMatch, Ranker};
pub use report::{ReportFormat, Reporter};
pub use scan::{ScanOutcome, scan_all};
pub use similarity::{Processor, Scorer};

pub const BANNER: &str = r#"
     _                       _                       _   _
  __| | ___  _ __ ___   __ _(_)_ __  ___ _ __   ___ | |_| |_ ___ _ __
 / _` |/ _ \| '_ ` _ \ / _` | | '_ \/ __| '_ \ / _ \| __| __/ _ \ '__|
| (_| | (_) | | | | | | (_| | | | | \__ \ |_) | (_) | |_| ||  __/ |
 \__,_|\___/|_| |_| |_|\__,_|_|_| |_|___/ .__/ \___/ \__|\__\___|_|
                                        |_|
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_cyan());
    println!(
        "  {} {}",
        "newly registered domain search".bright_white().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("{}", "-".repeat(72).bright_blue());
    println!();
}
