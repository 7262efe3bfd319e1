//! Operation types submitted for commission calculation.

use crate::{Currency, FieldError, Money, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of the user performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// Natural person.
    Private,
    /// Legal entity.
    Business,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Private => "private",
            UserType::Business => "business",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "private" => Ok(UserType::Private),
            "business" => Ok(UserType::Business),
            other => Err(FieldError::UnknownUserType(other.to_string())),
        }
    }
}

/// Kind of money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Deposit,
    Withdraw,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Deposit => "deposit",
            OperationType::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "deposit" => Ok(OperationType::Deposit),
            "withdraw" => Ok(OperationType::Withdraw),
            other => Err(FieldError::UnknownOperationType(other.to_string())),
        }
    }
}

/// A single ingested operation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Calendar date of the operation.
    pub date: NaiveDate,
    /// User performing the operation.
    pub user_id: UserId,
    /// Category of that user.
    pub user_type: UserType,
    /// Deposit or withdrawal.
    pub operation_type: OperationType,
    /// Amount in the operation's own currency.
    pub amount: Money,
}

impl Operation {
    /// Create a new operation.
    pub fn new(
        date: NaiveDate,
        user_id: UserId,
        user_type: UserType,
        operation_type: OperationType,
        amount: Money,
    ) -> Self {
        Self {
            date,
            user_id,
            user_type,
            operation_type,
            amount,
        }
    }

    /// Currency the operation is denominated in.
    pub fn currency(&self) -> &Currency {
        &self.amount.currency
    }

    pub fn is_withdrawal(&self) -> bool {
        self.operation_type == OperationType::Withdraw
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} user {} ({}) {} {}",
            self.date, self.user_id, self.user_type, self.operation_type, self.amount
        )
    }
}
