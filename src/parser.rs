//! Norma 43 parsing state machine.
//!
//! A parse walks the line sequence once, front to back. Each line is
//! classified by its record code, decoded at fixed offsets, run through the
//! movement filters and placed into the document. The first bad line stops
//! the parse; the document assembled so far is returned with the error.

use crate::account::Account;
use crate::date::DateOrder;
use crate::error::{Norma43Error, ParseFailure, Result};
use crate::filter::{ExtraInfoVerdict, MovementFilter};
use crate::model::Document;
use crate::record::{LineKind, RecordLine};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Parser configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Strip surrounding whitespace from every line before decoding
    pub trim: bool,

    /// Date order of the rendered report. Decoding never reads it: record
    /// dates are always `YYMMDD` in the file format.
    pub date_order: DateOrder,

    /// Leave out movements with a positive amount
    pub filter_positive: bool,

    /// Leave out movements with a negative amount
    pub filter_negative: bool,

    /// Keep only movements whose continuation lines match this regex
    pub include_pattern: Option<String>,

    /// Drop movements whose continuation lines match this regex
    pub exclude_pattern: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectHeaderOrEnd,
    InBody,
    AfterFooter,
    Done,
}

/// Owner of the continuation lines currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtraInfoTarget {
    /// No movement has been read in this account yet
    Nothing,
    /// The last movement was appended and is still in the account
    Retained,
    /// The last movement was dropped by a sign filter
    Rejected,
    /// The last movement was removed by a content filter
    Purged,
}

/// A configured Norma 43 parser over a materialized line sequence.
///
/// # Example
///
/// ```
/// use norma43::{Parser, ParserOptions};
///
/// let data = "\
/// 111111222233334444122002032002102000000002463439783ACCOUNT NAME
/// 22    22222002032002041240810000000000239900000000000000000000001234567890123456
/// 2301COMPRA TARG 1234XXXXXXXX3456
/// 3311112222333344441200001000000000023990000000000000000000200000000243944978
/// 88999999999999999999000004";
///
/// let parser = Parser::new(data.lines(), ParserOptions::default()).unwrap();
/// let document = parser.parse().unwrap();
/// let movement = &document.accounts[0].movements[0];
/// assert_eq!(movement.amount.to_string(), "-23.99");
/// assert_eq!(movement.balance.to_string(), "2439.44");
/// assert_eq!(document.reported_entries, Some(4));
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    lines: Vec<String>,
    options: ParserOptions,
    filter: MovementFilter,
}

impl Parser {
    /// Creates a parser, compiling the configured content patterns.
    pub fn new<I, S>(lines: I, options: ParserOptions) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let filter = MovementFilter::new(&options)?;
        Ok(Parser {
            lines: lines.into_iter().map(Into::into).collect(),
            options,
            filter,
        })
    }

    /// Decodes the whole line sequence.
    ///
    /// On failure the returned `ParseFailure` carries the partial document.
    pub fn parse(&self) -> std::result::Result<Document, ParseFailure> {
        let mut run = ParseRun {
            cursor: Cursor {
                lines: &self.lines,
                pos: 0,
                trim: self.options.trim,
            },
            filter: &self.filter,
            document: Document::default(),
            state: State::ExpectHeaderOrEnd,
            target: ExtraInfoTarget::Nothing,
        };

        match run.run() {
            Ok(()) => Ok(run.document),
            Err(error) => Err(ParseFailure {
                error,
                partial: run.document,
            }),
        }
    }
}

/// Position in the line sequence. `pos` is the index of the next unread line,
/// which is also the 1-based number of the last consumed one.
struct Cursor<'a> {
    lines: &'a [String],
    pos: usize,
    trim: bool,
}

impl<'a> Cursor<'a> {
    fn line_at(&self, idx: usize) -> Option<RecordLine<'a>> {
        let text = self.lines.get(idx)?.as_str();
        let text = if self.trim { text.trim() } else { text };
        Some(RecordLine::new(text, idx + 1))
    }

    fn advance(&mut self) -> Option<RecordLine<'a>> {
        let line = self.line_at(self.pos)?;
        self.pos += 1;
        Some(line)
    }

    fn peek(&self) -> Option<RecordLine<'a>> {
        self.line_at(self.pos)
    }

    fn remaining(&self) -> usize {
        self.lines.len().saturating_sub(self.pos)
    }
}

struct ParseRun<'a> {
    cursor: Cursor<'a>,
    filter: &'a MovementFilter,
    document: Document,
    state: State,
    target: ExtraInfoTarget,
}

fn malformed(line: usize, message: impl Into<String>) -> Norma43Error {
    Norma43Error::MalformedDocument {
        line,
        message: message.into(),
    }
}

impl<'a> ParseRun<'a> {
    fn run(&mut self) -> Result<()> {
        loop {
            self.state = match self.state {
                State::ExpectHeaderOrEnd => self.expect_header_or_end()?,
                State::InBody => self.read_body_line()?,
                State::AfterFooter => self.after_footer()?,
                State::Done => return Ok(()),
            };
        }
    }

    /// Consumes the next line; running out of input is a structural error.
    fn next_line(&mut self, context: &str) -> Result<RecordLine<'a>> {
        let last = self.cursor.pos;
        self.cursor
            .advance()
            .ok_or_else(|| malformed(last, format!("unexpected end of input: {}", context)))
    }

    /// Looks at the next line without consuming it.
    fn peek_kind(&self, context: &str) -> Result<LineKind> {
        match self.cursor.peek() {
            Some(line) => line.kind(),
            None => Err(malformed(
                self.cursor.pos,
                format!("unexpected end of input: {}", context),
            )),
        }
    }

    fn current_account(&mut self, line: usize) -> Result<&mut Account> {
        self.document
            .accounts
            .last_mut()
            .ok_or_else(|| malformed(line, "record outside of an account"))
    }

    fn expect_header_or_end(&mut self) -> Result<State> {
        let line = self.next_line("expected an account header")?;
        match line.kind()? {
            LineKind::Header => {
                self.open_account(&line)?;
                Ok(State::InBody)
            }
            LineKind::EndOfFile => {
                self.finish(&line)?;
                Ok(State::Done)
            }
            kind => Err(malformed(
                line.number(),
                format!("expected an account header, found record {}", kind.code()),
            )),
        }
    }

    fn read_body_line(&mut self) -> Result<State> {
        let line = self.next_line("account has no footer")?;
        match line.kind()? {
            LineKind::Movement => {
                self.movement(&line)?;
                Ok(State::InBody)
            }
            LineKind::MovementExtraInfo => {
                self.extra_information(line)?;
                Ok(State::InBody)
            }
            LineKind::Footer => {
                self.close_account(&line)?;
                Ok(State::AfterFooter)
            }
            kind @ (LineKind::Header | LineKind::EndOfFile) => Err(malformed(
                line.number(),
                format!("account has no footer, found record {}", kind.code()),
            )),
        }
    }

    fn after_footer(&mut self) -> Result<State> {
        let Some(next) = self.cursor.peek() else {
            warn!(
                "Line {}: Input ended without an end-of-file record",
                self.cursor.pos
            );
            return Ok(State::Done);
        };

        match next.kind()? {
            LineKind::Header | LineKind::EndOfFile => Ok(State::ExpectHeaderOrEnd),
            kind => Err(malformed(
                next.number(),
                format!(
                    "expected a header or end-of-file record after the footer, found record {}",
                    kind.code()
                ),
            )),
        }
    }

    fn open_account(&mut self, line: &RecordLine<'a>) -> Result<()> {
        let header = line.header()?;
        debug!(
            "Line {}: Opening account {}-{}-{} with balance {}",
            line.number(),
            header.bank_code,
            header.branch_code,
            header.account_number,
            header.initial_balance
        );
        self.document.accounts.push(Account::new(header));
        self.target = ExtraInfoTarget::Nothing;
        Ok(())
    }

    fn close_account(&mut self, line: &RecordLine<'a>) -> Result<()> {
        let footer = line.footer()?;
        let account = self.current_account(line.number())?;
        debug!(
            "Line {}: Closing account {} with {} movements, final balance {}",
            line.number(),
            footer.account_number,
            account.movements.len(),
            footer.final_balance
        );
        account.footer = Some(footer);
        self.target = ExtraInfoTarget::Nothing;
        Ok(())
    }

    fn finish(&mut self, line: &RecordLine<'a>) -> Result<()> {
        let reported = line.reported_entries()?;
        self.document.reported_entries = Some(reported);

        let trailing = self.cursor.remaining();
        if trailing > 0 {
            warn!(
                "Line {}: Ignoring {} lines after the end-of-file record",
                line.number(),
                trailing
            );
        }
        Ok(())
    }

    fn movement(&mut self, line: &RecordLine<'a>) -> Result<()> {
        let record = line.movement()?;

        if self.filter.rejects_amount(record.amount) {
            debug!(
                "Line {}: Rejecting movement of {} by sign filter",
                line.number(),
                record.amount
            );
            if self.peek_kind("rejected movement is not followed by another record")?
                == LineKind::MovementExtraInfo
            {
                self.cursor.advance();
            }
            self.target = ExtraInfoTarget::Rejected;
            return Ok(());
        }

        let account = self.current_account(line.number())?;
        let movement = account.append(record);
        debug!(
            "Line {}: Movement of {}, balance {}",
            line.number(),
            movement.amount,
            movement.balance
        );
        self.target = ExtraInfoTarget::Retained;
        Ok(())
    }

    /// Handles a run of consecutive continuation lines starting at `line`.
    fn extra_information(&mut self, line: RecordLine<'a>) -> Result<()> {
        let mut line = line;
        loop {
            let payload = line.extra_information()?;
            self.apply_extra_information(line.number(), payload)?;

            if self.peek_kind("continuation line is not followed by another record")?
                != LineKind::MovementExtraInfo
            {
                return Ok(());
            }
            line = self.next_line("continuation line")?;
        }
    }

    fn apply_extra_information(&mut self, number: usize, payload: String) -> Result<()> {
        match self.target {
            ExtraInfoTarget::Nothing => Err(malformed(
                number,
                "continuation line without a preceding movement",
            )),
            ExtraInfoTarget::Rejected | ExtraInfoTarget::Purged => {
                debug!(
                    "Line {}: Discarding continuation line of a filtered movement",
                    number
                );
                Ok(())
            }
            ExtraInfoTarget::Retained => {
                let verdict = self.filter.evaluate(&payload);
                let account = self.current_account(number)?;
                match verdict {
                    ExtraInfoVerdict::Attach => {
                        account.attach_extra_information(payload);
                    }
                    ExtraInfoVerdict::Purge => {
                        if let Some(purged) = account.purge_last_movement() {
                            debug!(
                                "Line {}: Purging movement of {} by content filter",
                                number, purged.amount
                            );
                        }
                        self.target = ExtraInfoTarget::Purged;
                    }
                }
                Ok(())
            }
        }
    }
}
