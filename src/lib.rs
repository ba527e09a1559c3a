//! # Norma 43
//!
//! A decoder for the Spanish banking statement format known as Norma 43
//! (AEB43): fixed-width text lines holding one or more account statements,
//! each with a header, movements with optional continuation lines, and a
//! footer, closed by an end-of-file record.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: Amounts and running balances use `rust_decimal`
//! - **Single pass, fail fast**: The first bad line aborts the parse and the
//!   partial document is handed back with the error
//! - **Typed records**: Line codes are classified into an enum and matched
//!   exhaustively
//!
//! ## Example
//!
//! ```no_run
//! use norma43::{read_file, render, Parser, ParserOptions, Template};
//!
//! let lines = read_file("statement.n43").unwrap();
//! let document = Parser::new(lines, ParserOptions::default())
//!     .unwrap()
//!     .parse()
//!     .unwrap();
//! render(&document, &Template::default(), std::io::stdout()).unwrap();
//! ```

pub mod account;
pub mod amount;
pub mod date;
pub mod error;
pub mod filter;
pub mod model;
pub mod parser;
pub mod record;
pub mod render;
pub mod source;

pub use account::Account;
pub use amount::Amount;
pub use date::DateOrder;
pub use error::{Norma43Error, ParseFailure, Result};
pub use filter::{ExtraInfoVerdict, MovementFilter};
pub use model::{Document, Footer, Header, Movement};
pub use parser::{Parser, ParserOptions};
pub use record::{LineKind, MovementRecord, RecordLine};
pub use render::{render, Field, FooterField, HeaderField, MovementField, Template};
pub use source::{parse_reader, read_file, read_lines};
