//! Norma 43 CLI
//!
//! Decodes a Norma 43 statement and prints one delimited row per header,
//! movement and footer.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --in statement.n43 --trim --filter-positive > movements.txt
//! cat statement.n43 | cargo run -- --line-tpl .TransactionDate,.Amount --sep ';'
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use clap::Parser as ClapParser;
use norma43::{
    read_file, read_lines, render, DateOrder, Norma43Error, Parser, ParserOptions, Result,
    Template,
};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;

const DEFAULT_HEADER_TPL: &str = ".BankCode,.BranchCode,.AccountNumber,.StartDate,.EndDate,\
.InitialBalance,.Currency,.InformationModeCode,.AccountName";
const DEFAULT_LINE_TPL: &str =
    ".BranchCode,.TransactionDate,.ValueDate,.Amount,.Balance,.Description,.ExtraInformation";
const DEFAULT_FOOTER_TPL: &str = ".BankCode,.BranchCode,.AccountNumber,.DebitEntries,\
.DebitAmount,.CreditEntries,.CreditAmount,.FinalBalance,.Currency";

#[derive(ClapParser, Debug)]
#[command(name = "norma43", version, about = "Decode Norma 43 (AEB43) bank statements")]
struct Cli {
    /// Read from this file instead of stdin
    #[arg(long = "in", value_name = "FILE")]
    input: Option<PathBuf>,

    /// Trim spaces surrounding lines
    #[arg(long)]
    trim: bool,

    /// Date order used in the report
    #[arg(long = "time-format", value_enum, default_value_t = DateOrder::YearMonthDay)]
    time_format: DateOrder,

    /// Leave out movements with a positive amount
    #[arg(long)]
    filter_positive: bool,

    /// Leave out movements with a negative amount
    #[arg(long)]
    filter_negative: bool,

    /// Keep only movements whose extra information matches this regex
    #[arg(long = "filter-line-in", value_name = "REGEX")]
    filter_line_in: Option<String>,

    /// Drop movements whose extra information matches this regex
    #[arg(long = "filter-line-out", value_name = "REGEX")]
    filter_line_out: Option<String>,

    /// Fields of the account header row
    #[arg(long = "header-tpl", default_value = DEFAULT_HEADER_TPL)]
    header_tpl: String,

    /// Fields of each movement row
    #[arg(long = "line-tpl", default_value = DEFAULT_LINE_TPL)]
    line_tpl: String,

    /// Fields of the account footer row
    #[arg(long = "footer-tpl", default_value = DEFAULT_FOOTER_TPL)]
    footer_tpl: String,

    /// Field separator (a single ASCII character)
    #[arg(long = "sep", default_value_t = ' ')]
    sep: char,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let separator = u8::try_from(cli.sep)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(Norma43Error::InvalidSeparator(cli.sep))?;

    let options = ParserOptions {
        trim: cli.trim,
        date_order: cli.time_format,
        filter_positive: cli.filter_positive,
        filter_negative: cli.filter_negative,
        include_pattern: cli.filter_line_in,
        exclude_pattern: cli.filter_line_out,
    };

    let template = Template::parse(&cli.header_tpl, &cli.line_tpl, &cli.footer_tpl)?
        .with_separator(separator)
        .with_date_order(options.date_order);

    let lines = match &cli.input {
        Some(path) => read_file(path)?,
        None => read_lines(io::stdin().lock())?,
    };

    let document = Parser::new(lines, options)?.parse()?;

    let stdout = io::stdout();
    let handle = BufWriter::new(stdout.lock());
    render(&document, &template, handle)?;

    Ok(())
}
