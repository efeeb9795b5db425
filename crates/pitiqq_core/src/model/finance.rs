//! Personal finance records: ledger movements, budgets, savings goals and
//! the foreign-currency account.
//!
//! # Invariants
//! - Amounts are non-negative magnitudes; `MovementKind` carries the sign.
//! - Goal contributions are append-only and timestamped at creation.

use super::record::{impl_record, lenient_date, lenient_f64, RecordId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

wire_enum! {
    /// Direction of a ledger movement.
    pub enum MovementKind {
        Income => "income",
        Expense => "expense",
    }
    default = Expense;
}

/// One ledger entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Movement {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    /// ISO date (`YYYY-MM-DD`); month grouping is a prefix match.
    pub date: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: f64,
    pub category: String,
    pub description: String,
}

impl Movement {
    pub fn new(
        kind: MovementKind,
        date: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: RecordId::default(),
            kind,
            date: date.into(),
            amount,
            category: category.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Monthly spending cap for one expense category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Budget {
    pub id: RecordId,
    pub category: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: f64,
}

/// One deposit toward a goal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Contribution {
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: f64,
    pub date: DateTime<Utc>,
}

/// Savings goal with its contribution history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Goal {
    pub id: RecordId,
    pub name: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub target: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub current: f64,
    #[serde(
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<NaiveDate>,
    pub contributions: Vec<Contribution>,
}

impl Goal {
    pub fn new(name: impl Into<String>, target: f64, deadline: Option<NaiveDate>) -> Self {
        Self {
            name: name.into(),
            target,
            deadline,
            ..Self::default()
        }
    }

    /// Appends a contribution stamped `at` and raises `current`.
    pub fn contribute(&mut self, amount: f64, at: DateTime<Utc>) {
        self.current += amount;
        self.contributions.push(Contribution { amount, date: at });
    }
}

wire_enum! {
    /// Side of a currency operation.
    pub enum DollarOperationKind {
        Buy => "compra",
        Sell => "venta",
    }
    default = Buy;
}

/// One buy/sell of foreign currency.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DollarOperation {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: DollarOperationKind,
    /// Foreign-currency amount.
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: f64,
    /// Local price per unit.
    #[serde(deserialize_with = "lenient_f64")]
    pub price: f64,
    /// Local total (`amount * price`).
    #[serde(deserialize_with = "lenient_f64")]
    pub total: f64,
    pub date: String,
}

/// Foreign-currency holdings and their operation log.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DollarAccount {
    #[serde(deserialize_with = "lenient_f64")]
    pub balance: f64,
    pub operations: Vec<DollarOperation>,
}

impl DollarAccount {
    /// Records an operation and adjusts the balance, floored at zero.
    pub fn apply(&mut self, mut operation: DollarOperation) -> RecordId {
        operation.id = RecordId::generate();
        operation.total = operation.amount * operation.price;
        self.balance = match operation.kind {
            DollarOperationKind::Buy => self.balance + operation.amount,
            DollarOperationKind::Sell => (self.balance - operation.amount).max(0.0),
        };
        let id = operation.id.clone();
        self.operations.push(operation);
        id
    }

    /// Removes an operation and reverts its balance effect, floored at zero.
    ///
    /// Returns `false` when no operation has this id.
    pub fn revert(&mut self, id: &RecordId) -> bool {
        let Some(index) = self.operations.iter().position(|op| &op.id == id) else {
            return false;
        };
        let operation = self.operations.remove(index);
        let reverted = match operation.kind {
            DollarOperationKind::Buy => self.balance - operation.amount,
            DollarOperationKind::Sell => self.balance + operation.amount,
        };
        self.balance = reverted.max(0.0);
        true
    }
}

impl_record!(Movement, Budget, Goal);
