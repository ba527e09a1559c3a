//! Delimited-text report of a decoded document.
//!
//! Each record kind has a list of field selectors. Per account the report
//! holds one header row, one row per movement and one footer row.

use crate::amount::Amount;
use crate::date::DateOrder;
use crate::error::{Norma43Error, Result};
use crate::model::{Document, Footer, Header, Movement};
use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};
use std::io::Write;

/// A selectable column of one record kind.
pub trait Field: Copy + Sized + 'static {
    /// Record the field belongs to, used in error messages.
    const RECORD: &'static str;

    /// Every field, in default column order.
    const ALL: &'static [Self];

    type Record;

    /// Selector name, as written in templates (without the leading `.`).
    fn name(self) -> &'static str;

    /// Formats this field of `record`.
    fn value(self, record: &Self::Record, dates: DateOrder) -> String;

    /// Resolves a selector such as `BankCode` or `.BankCode`.
    fn lookup(selector: &str) -> Result<Self> {
        let name = selector.trim();
        let name = name.strip_prefix('.').unwrap_or(name);
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| Norma43Error::UnknownField {
                record: Self::RECORD,
                name: name.to_string(),
            })
    }

    /// Parses a comma-separated selector list. An empty list disables the row.
    fn parse_list(template: &str) -> Result<Vec<Self>> {
        if template.trim().is_empty() {
            return Ok(Vec::new());
        }
        template.split(',').map(Self::lookup).collect()
    }
}

fn date(value: NaiveDate, dates: DateOrder) -> String {
    value.format(dates.display_format()).to_string()
}

fn amount(value: Amount) -> String {
    value.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    BankCode,
    BranchCode,
    AccountNumber,
    StartDate,
    EndDate,
    InitialBalance,
    Currency,
    InformationModeCode,
    AccountName,
}

impl Field for HeaderField {
    const RECORD: &'static str = "header";
    const ALL: &'static [Self] = &[
        HeaderField::BankCode,
        HeaderField::BranchCode,
        HeaderField::AccountNumber,
        HeaderField::StartDate,
        HeaderField::EndDate,
        HeaderField::InitialBalance,
        HeaderField::Currency,
        HeaderField::InformationModeCode,
        HeaderField::AccountName,
    ];

    type Record = Header;

    fn name(self) -> &'static str {
        match self {
            HeaderField::BankCode => "BankCode",
            HeaderField::BranchCode => "BranchCode",
            HeaderField::AccountNumber => "AccountNumber",
            HeaderField::StartDate => "StartDate",
            HeaderField::EndDate => "EndDate",
            HeaderField::InitialBalance => "InitialBalance",
            HeaderField::Currency => "Currency",
            HeaderField::InformationModeCode => "InformationModeCode",
            HeaderField::AccountName => "AccountName",
        }
    }

    fn value(self, header: &Header, dates: DateOrder) -> String {
        match self {
            HeaderField::BankCode => header.bank_code.clone(),
            HeaderField::BranchCode => header.branch_code.clone(),
            HeaderField::AccountNumber => header.account_number.clone(),
            HeaderField::StartDate => date(header.start_date, dates),
            HeaderField::EndDate => date(header.end_date, dates),
            HeaderField::InitialBalance => amount(header.initial_balance),
            HeaderField::Currency => header.currency.clone(),
            HeaderField::InformationModeCode => header.information_mode.clone(),
            HeaderField::AccountName => header.account_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementField {
    BranchCode,
    TransactionDate,
    ValueDate,
    Amount,
    Balance,
    Description,
    ExtraInformation,
}

impl Field for MovementField {
    const RECORD: &'static str = "movement";
    const ALL: &'static [Self] = &[
        MovementField::BranchCode,
        MovementField::TransactionDate,
        MovementField::ValueDate,
        MovementField::Amount,
        MovementField::Balance,
        MovementField::Description,
        MovementField::ExtraInformation,
    ];

    type Record = Movement;

    fn name(self) -> &'static str {
        match self {
            MovementField::BranchCode => "BranchCode",
            MovementField::TransactionDate => "TransactionDate",
            MovementField::ValueDate => "ValueDate",
            MovementField::Amount => "Amount",
            MovementField::Balance => "Balance",
            MovementField::Description => "Description",
            MovementField::ExtraInformation => "ExtraInformation",
        }
    }

    fn value(self, movement: &Movement, dates: DateOrder) -> String {
        match self {
            MovementField::BranchCode => movement.branch_code.clone(),
            MovementField::TransactionDate => date(movement.transaction_date, dates),
            MovementField::ValueDate => date(movement.value_date, dates),
            MovementField::Amount => amount(movement.amount),
            MovementField::Balance => amount(movement.balance),
            MovementField::Description => movement.description.clone(),
            MovementField::ExtraInformation => movement.extra_information.join(" "),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterField {
    BankCode,
    BranchCode,
    AccountNumber,
    DebitEntries,
    DebitAmount,
    CreditEntries,
    CreditAmount,
    FinalBalance,
    Currency,
}

impl Field for FooterField {
    const RECORD: &'static str = "footer";
    const ALL: &'static [Self] = &[
        FooterField::BankCode,
        FooterField::BranchCode,
        FooterField::AccountNumber,
        FooterField::DebitEntries,
        FooterField::DebitAmount,
        FooterField::CreditEntries,
        FooterField::CreditAmount,
        FooterField::FinalBalance,
        FooterField::Currency,
    ];

    type Record = Footer;

    fn name(self) -> &'static str {
        match self {
            FooterField::BankCode => "BankCode",
            FooterField::BranchCode => "BranchCode",
            FooterField::AccountNumber => "AccountNumber",
            FooterField::DebitEntries => "DebitEntries",
            FooterField::DebitAmount => "DebitAmount",
            FooterField::CreditEntries => "CreditEntries",
            FooterField::CreditAmount => "CreditAmount",
            FooterField::FinalBalance => "FinalBalance",
            FooterField::Currency => "Currency",
        }
    }

    fn value(self, footer: &Footer, _dates: DateOrder) -> String {
        match self {
            FooterField::BankCode => footer.bank_code.clone(),
            FooterField::BranchCode => footer.branch_code.clone(),
            FooterField::AccountNumber => footer.account_number.clone(),
            FooterField::DebitEntries => footer.debit_entries.to_string(),
            FooterField::DebitAmount => amount(footer.debit_amount),
            FooterField::CreditEntries => footer.credit_entries.to_string(),
            FooterField::CreditAmount => amount(footer.credit_amount),
            FooterField::FinalBalance => amount(footer.final_balance),
            FooterField::Currency => footer.currency.clone(),
        }
    }
}

/// Column selection and formatting for a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub header: Vec<HeaderField>,
    pub movement: Vec<MovementField>,
    pub footer: Vec<FooterField>,
    pub separator: u8,
    pub date_order: DateOrder,
}

impl Default for Template {
    fn default() -> Self {
        Template {
            header: HeaderField::ALL.to_vec(),
            movement: MovementField::ALL.to_vec(),
            footer: FooterField::ALL.to_vec(),
            separator: b' ',
            date_order: DateOrder::default(),
        }
    }
}

impl Template {
    /// Builds a template from comma-separated selector lists.
    pub fn parse(header: &str, movement: &str, footer: &str) -> Result<Self> {
        Ok(Template {
            header: HeaderField::parse_list(header)?,
            movement: MovementField::parse_list(movement)?,
            footer: FooterField::parse_list(footer)?,
            ..Template::default()
        })
    }

    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_date_order(mut self, date_order: DateOrder) -> Self {
        self.date_order = date_order;
        self
    }

    fn row<F: Field>(&self, fields: &[F], record: &F::Record) -> Vec<String> {
        fields
            .iter()
            .map(|field| field.value(record, self.date_order))
            .collect()
    }
}

/// Writes the report for `document` to `writer`.
///
/// Fields are joined with the template separator and never quoted.
pub fn render<W: Write>(document: &Document, template: &Template, writer: W) -> Result<()> {
    let mut csv_writer = WriterBuilder::new()
        .delimiter(template.separator)
        .quote_style(QuoteStyle::Never)
        .flexible(true)
        .has_headers(false)
        .from_writer(writer);

    for account in &document.accounts {
        if !template.header.is_empty() {
            write_row(&mut csv_writer, template.row(&template.header, &account.header))?;
        }
        if !template.movement.is_empty() {
            for movement in &account.movements {
                write_row(&mut csv_writer, template.row(&template.movement, movement))?;
            }
        }
        if let Some(footer) = &account.footer {
            if !template.footer.is_empty() {
                write_row(&mut csv_writer, template.row(&template.footer, footer))?;
            }
        }
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes one report row.
///
/// A lone empty field is written as a bare line terminator; the csv writer
/// would otherwise emit `""` to keep the record distinguishable.
fn write_row<W: Write>(writer: &mut csv::Writer<W>, row: Vec<String>) -> Result<()> {
    if let [only] = row.as_slice() {
        if only.is_empty() {
            writer.flush()?;
            writer.get_mut().write_all(b"\n")?;
            return Ok(());
        }
    }
    writer.write_record(&row)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Parser, ParserOptions};

    const FIXTURE: &str = "\
111111222233334444122002032002102000000002463439783ACCOUNT NAME ************
22    22222002032002041240810000000000239900000000000000000000001234567890123456
2301COMPRA TARG 1234XXXXXXXX3456 SHOP TO BUY SEVERAL THINGS IN THERE.
2302SECOND LINE
3311112222333344441200015000000000661840000100000000050000200000000230159978
88999999999999999999000034";

    fn document() -> Document {
        Parser::new(FIXTURE.lines(), ParserOptions::default())
            .unwrap()
            .parse()
            .unwrap()
    }

    fn render_to_string(template: &Template) -> String {
        let mut output = Vec::new();
        render(&document(), template, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_default_template() {
        let output = render_to_string(&Template::default());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "1111 2222 3333444412 2020-02-03 2020-02-10 2463.43 978 3 ACCOUNT NAME ************"
        );
        assert_eq!(
            lines[1],
            "2222 2020-02-03 2020-02-04 -23.99 2439.44 0000000000001234567890123456 \
             COMPRA TARG 1234XXXXXXXX3456 SHOP TO BUY SEVERAL THINGS IN THERE. SECOND LINE"
        );
        assert_eq!(
            lines[2],
            "1111 2222 3333444412 15 661.84 1 50000.00 2301.59 978"
        );
    }

    #[test]
    fn test_selected_fields_and_separator() {
        let template = Template::parse(".BankCode,.AccountNumber", "Amount, Balance", "")
            .unwrap()
            .with_separator(b';');
        let output = render_to_string(&template);
        assert_eq!(output, "1111;3333444412\n-23.99;2439.44\n");
    }

    #[test]
    fn test_day_month_year_dates() {
        let template = Template::parse("StartDate,EndDate", "", "")
            .unwrap()
            .with_date_order(DateOrder::DayMonthYear);
        assert_eq!(render_to_string(&template), "03/02/2020 10/02/2020\n");
    }

    #[test]
    fn test_single_empty_field_renders_blank_line() {
        let lines: Vec<&str> = FIXTURE
            .lines()
            .filter(|line| !line.starts_with("23"))
            .collect();
        let document = Parser::new(lines, ParserOptions::default())
            .unwrap()
            .parse()
            .unwrap();
        let template = Template::parse("BankCode", "ExtraInformation", "").unwrap();

        let mut output = Vec::new();
        render(&document, &template, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "1111\n\n");
    }

    #[test]
    fn test_empty_field_among_others_keeps_separators() {
        let template = Template::parse("BankCode,AccountName", "", "")
            .unwrap()
            .with_separator(b';');
        let mut document = document();
        document.accounts[0].header.account_name.clear();

        let mut output = Vec::new();
        render(&document, &template, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "1111;\n");
    }

    #[test]
    fn test_selectors_are_case_insensitive() {
        assert_eq!(
            MovementField::lookup("extrainformation").unwrap(),
            MovementField::ExtraInformation
        );
    }

    #[test]
    fn test_unknown_field() {
        match Template::parse(".BankCode", ".Amount,.Nope", "") {
            Err(Norma43Error::UnknownField { record, name }) => {
                assert_eq!(record, "movement");
                assert_eq!(name, "Nope");
            }
            other => panic!("Expected UnknownField, got {:?}", other),
        }
    }
}
