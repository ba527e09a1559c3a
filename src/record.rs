//! Line classification and fixed-width record decoding.
//!
//! Every Norma 43 line starts with a 2-character record code followed by
//! fields at fixed column offsets. Offsets below are half-open, 0-based ranges.

use crate::amount::Amount;
use crate::date::DateOrder;
use crate::error::{Norma43Error, Result};
use crate::model::{Footer, Header};
use chrono::NaiveDate;
use std::ops::Range;

/// Date order used by every record in the file format, independent of any
/// caller preference.
pub const RECORD_DATE_ORDER: DateOrder = DateOrder::YearMonthDay;

/// Length of the payload prefix (`23` + 2-digit sequence) on continuation lines.
pub const EXTRA_INFO_PREFIX_LEN: usize = 4;

const HEADER_MIN_LEN: usize = 51;
const MOVEMENT_MIN_LEN: usize = 52;
const FOOTER_MIN_LEN: usize = 76;
const END_OF_FILE_MIN_LEN: usize = 20;

/// Record kinds, keyed by the code at offset 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// `11`: account header
    Header,
    /// `22`: movement
    Movement,
    /// `23`: free-text continuation of the preceding movement
    MovementExtraInfo,
    /// `33`: account footer
    Footer,
    /// `88`: end of file
    EndOfFile,
}

impl LineKind {
    /// Maps a 2-character record code to its kind.
    pub fn from_code(code: &[u8]) -> Option<Self> {
        match code {
            b"11" => Some(LineKind::Header),
            b"22" => Some(LineKind::Movement),
            b"23" => Some(LineKind::MovementExtraInfo),
            b"33" => Some(LineKind::Footer),
            b"88" => Some(LineKind::EndOfFile),
            _ => None,
        }
    }

    /// The record code for this kind.
    pub fn code(self) -> &'static str {
        match self {
            LineKind::Header => "11",
            LineKind::Movement => "22",
            LineKind::MovementExtraInfo => "23",
            LineKind::Footer => "33",
            LineKind::EndOfFile => "88",
        }
    }
}

/// A decoded movement line, before it is placed in an account.
///
/// The file carries no per-movement balance; `Account::append` computes it.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementRecord {
    pub branch_code: String,
    pub transaction_date: NaiveDate,
    pub value_date: NaiveDate,
    pub amount: Amount,
    pub description: String,
}

/// One physical input line together with its 1-based position.
#[derive(Debug, Clone, Copy)]
pub struct RecordLine<'a> {
    text: &'a str,
    number: usize,
}

impl<'a> RecordLine<'a> {
    pub fn new(text: &'a str, number: usize) -> Self {
        RecordLine { text, number }
    }

    /// 1-based line number.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Classifies the line by its leading record code.
    pub fn kind(&self) -> Result<LineKind> {
        let code = self.slice(0..2)?;
        LineKind::from_code(code.as_bytes()).ok_or_else(|| Norma43Error::InvalidLineCode {
            line: self.number,
            code: code.to_string(),
        })
    }

    /// Length in character positions.
    fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Byte offset of character position `pos`, clamped to the end of the line.
    fn offset(&self, pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(pos)
            .map_or(self.text.len(), |(idx, _)| idx)
    }

    fn require(&self, expected: usize) -> Result<()> {
        let found = self.len();
        if found < expected {
            return Err(Norma43Error::TruncatedRecord {
                line: self.number,
                expected,
                found,
            });
        }
        Ok(())
    }

    /// Columns `range` of the line, counted in characters so that a Latin-1
    /// byte decoded to a multi-byte char still occupies one column.
    fn slice(&self, range: Range<usize>) -> Result<&'a str> {
        self.require(range.end)?;
        Ok(&self.text[self.offset(range.start)..self.offset(range.end)])
    }

    fn field(&self, range: Range<usize>) -> Result<String> {
        Ok(self.slice(range)?.to_string())
    }

    fn rest(&self, start: usize) -> Result<String> {
        self.field(start..self.len().max(start))
    }

    fn flag(&self, offset: usize) -> Result<u8> {
        Ok(self.slice(offset..offset + 1)?.bytes().next().unwrap_or_default())
    }

    fn digits(&self, range: Range<usize>, field: &'static str) -> Result<u64> {
        let raw = self.slice(range)?;
        let invalid = || Norma43Error::InvalidNumber {
            line: self.number,
            field,
            value: raw.to_string(),
        };

        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        raw.bytes().try_fold(0u64, |acc, digit| {
            acc.checked_mul(10)
                .and_then(|acc| acc.checked_add(u64::from(digit - b'0')))
                .ok_or_else(|| invalid())
        })
    }

    fn count(&self, range: Range<usize>, field: &'static str) -> Result<u32> {
        let value = self.digits(range, field)?;
        u32::try_from(value).map_err(|_| Norma43Error::InvalidNumber {
            line: self.number,
            field,
            value: value.to_string(),
        })
    }

    fn amount(&self, range: Range<usize>, field: &'static str, cents: bool) -> Result<Amount> {
        let value = self.digits(range, field)?;
        let value = i64::try_from(value).map_err(|_| Norma43Error::InvalidNumber {
            line: self.number,
            field,
            value: value.to_string(),
        })?;
        Ok(if cents {
            Amount::from_cents(value)
        } else {
            Amount::from_units(value)
        })
    }

    fn signed_amount(
        &self,
        sign_at: usize,
        range: Range<usize>,
        field: &'static str,
    ) -> Result<Amount> {
        let sign = self.flag(sign_at)?;
        Ok(self.amount(range, field, true)?.with_sign_flag(sign))
    }

    fn date(&self, range: Range<usize>) -> Result<NaiveDate> {
        let raw = self.field(range)?;
        RECORD_DATE_ORDER
            .decode(&raw)
            .ok_or(Norma43Error::InvalidDate {
                line: self.number,
                value: raw,
            })
    }

    /// Decodes a record 11 line.
    pub fn header(&self) -> Result<Header> {
        self.require(HEADER_MIN_LEN)?;
        Ok(Header {
            bank_code: self.field(2..6)?,
            branch_code: self.field(6..10)?,
            account_number: self.field(10..20)?,
            start_date: self.date(20..26)?,
            end_date: self.date(26..32)?,
            initial_balance: self.signed_amount(32, 33..47, "initial balance")?,
            currency: self.field(47..50)?,
            information_mode: self.field(50..51)?,
            account_name: self.rest(51)?,
        })
    }

    /// Decodes a record 22 line.
    pub fn movement(&self) -> Result<MovementRecord> {
        self.require(MOVEMENT_MIN_LEN)?;
        Ok(MovementRecord {
            branch_code: self.field(6..10)?,
            transaction_date: self.date(10..16)?,
            value_date: self.date(16..22)?,
            amount: self.signed_amount(27, 28..42, "movement amount")?,
            description: self.rest(52)?,
        })
    }

    /// Returns the payload of a record 23 line.
    pub fn extra_information(&self) -> Result<String> {
        self.require(EXTRA_INFO_PREFIX_LEN)?;
        self.rest(EXTRA_INFO_PREFIX_LEN)
    }

    /// Decodes a record 33 line.
    pub fn footer(&self) -> Result<Footer> {
        self.require(FOOTER_MIN_LEN)?;
        Ok(Footer {
            bank_code: self.field(2..6)?,
            branch_code: self.field(6..10)?,
            account_number: self.field(10..20)?,
            debit_entries: self.count(20..25, "debit entries")?,
            debit_amount: self.amount(25..39, "debit amount", true)?,
            credit_entries: self.count(39..44, "credit entries")?,
            credit_amount: self.amount(44..58, "credit amount", false)?,
            final_balance: self.signed_amount(58, 59..73, "final balance")?,
            currency: self.field(73..76)?,
        })
    }

    /// Decodes the reported record count of a record 88 line.
    pub fn reported_entries(&self) -> Result<u64> {
        self.require(END_OF_FILE_MIN_LEN)?;
        self.digits(END_OF_FILE_MIN_LEN..self.len(), "reported entries")
    }
}
