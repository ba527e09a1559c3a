//! Account statement assembly and the running-balance chain.

use crate::amount::Amount;
use crate::model::{Footer, Header, Movement};
use crate::record::MovementRecord;
use serde::{Deserialize, Serialize};

/// One account statement: a header, its retained movements and a footer.
///
/// # Invariants
///
/// - `movements[0].balance == header.initial_balance + movements[0].amount`
/// - `movements[i].balance == movements[i - 1].balance + movements[i].amount`
///
/// Only retained movements take part in the chain: a movement dropped by a
/// filter never contributes to later balances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub header: Header,
    pub movements: Vec<Movement>,

    /// Absent until the footer line has been read
    pub footer: Option<Footer>,
}

impl Account {
    /// Opens a statement with no movements and no footer yet.
    pub fn new(header: Header) -> Self {
        Account {
            header,
            movements: Vec::new(),
            footer: None,
        }
    }

    /// Balance the next appended movement starts from.
    pub fn current_balance(&self) -> Amount {
        match self.movements.last() {
            Some(last) => last.balance,
            None => self.header.initial_balance,
        }
    }

    /// Appends a decoded movement line, computing its running balance.
    pub fn append(&mut self, record: MovementRecord) -> &Movement {
        let balance = self.current_balance() + record.amount;
        self.movements.push(Movement {
            branch_code: record.branch_code,
            transaction_date: record.transaction_date,
            value_date: record.value_date,
            amount: record.amount,
            balance,
            description: record.description,
            extra_information: Vec::new(),
        });
        &self.movements[self.movements.len() - 1]
    }

    /// Adds a continuation-line payload to the most recent movement.
    ///
    /// Returns `false` if the account has no movement to attach it to.
    pub fn attach_extra_information(&mut self, text: String) -> bool {
        match self.movements.last_mut() {
            Some(movement) => {
                movement.extra_information.push(text);
                true
            }
            None => false,
        }
    }

    /// Removes the most recent movement together with its continuation lines.
    ///
    /// The remaining movements keep their order.
    pub fn purge_last_movement(&mut self) -> Option<Movement> {
        self.movements.pop()
    }

    /// Returns `true` once the footer has been read.
    pub fn is_closed(&self) -> bool {
        self.footer.is_some()
    }

    /// Verifies the running-balance chain over the retained movements.
    pub fn check_balance_chain(&self) -> bool {
        let mut expected = self.header.initial_balance;
        self.movements.iter().all(|movement| {
            expected += movement.amount;
            movement.balance == expected
        })
    }
}
