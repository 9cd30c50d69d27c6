//! # Customer
//!
//! A customer with a guarded, never-negative balance.
//!
//! The balance only moves through `add_balance`/`deduct_balance`; both
//! reject negative amounts, and a rejected call changes nothing.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_amount, validate_name};

/// A customer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Display name. Immutable.
    name: String,

    /// Current balance in minor currency units. Never negative.
    balance: Money,
}

impl Customer {
    /// Creates a customer with an opening balance.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::customer::Customer;
    /// use tally_core::money::Money;
    ///
    /// let sara = Customer::new("Sara", Money::from_minor(20000)).unwrap();
    /// assert_eq!(sara.balance().minor(), 20000);
    /// ```
    pub fn new(name: impl Into<String>, opening_balance: Money) -> CoreResult<Self> {
        let name: String = name.into();
        let name = name.trim().to_string();

        validate_name(&name)?;
        validate_amount("balance", opening_balance)?;

        Ok(Customer {
            name,
            balance: opening_balance,
        })
    }

    /// Display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current balance.
    #[inline]
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Credits the balance. Rejects negative amounts; zero is a no-op credit.
    pub fn add_balance(&mut self, amount: Money) -> CoreResult<()> {
        validate_amount("amount", amount)?;
        self.balance += amount;
        Ok(())
    }

    /// Debits the balance atomically.
    ///
    /// Fails with `InsufficientBalance` if `amount` exceeds the current
    /// balance; the balance is untouched on any failure.
    pub fn deduct_balance(&mut self, amount: Money) -> CoreResult<()> {
        validate_amount("amount", amount)?;

        if amount > self.balance {
            return Err(CoreError::InsufficientBalance {
                required: amount,
                available: self.balance,
            });
        }

        self.balance -= amount;
        Ok(())
    }
}
