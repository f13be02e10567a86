//! Property tests for the account rules
//!
//! Run with: cargo test --test account_properties

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use rust_decimal::Decimal;

use bankline_core::{Account, CheckingLimits, ClientId, Error, Transaction};

fn noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 8, 20)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Amounts in cents, two decimal places
fn cents(range: std::ops::RangeInclusive<i64>) -> impl Strategy<Value = Decimal> {
    range.prop_map(|c| Decimal::new(c, 2))
}

fn checking_with(balance: Decimal, limits: CheckingLimits) -> Account {
    let mut account = Account::checking(1, ClientId::new(), limits);
    if balance > Decimal::ZERO {
        Transaction::deposit(balance, noon()).apply(&mut account).unwrap();
    }
    account
}

proptest! {
    #[test]
    fn non_positive_amounts_change_nothing(
        balance in cents(0..=1_000_000),
        amount in cents(-1_000_000..=0),
    ) {
        let mut account = checking_with(balance, CheckingLimits::default());
        let history_len = account.history().len();

        let deposit = Transaction::deposit(amount, noon()).apply(&mut account);
        let withdrawal = Transaction::withdrawal(amount, noon()).apply(&mut account);

        let deposit_is_invalid = matches!(deposit, Err(Error::InvalidAmount { .. }));
        let withdrawal_is_invalid = matches!(withdrawal, Err(Error::InvalidAmount { .. }));
        prop_assert!(deposit_is_invalid);
        prop_assert!(withdrawal_is_invalid);
        prop_assert_eq!(account.balance(), balance);
        prop_assert_eq!(account.history().len(), history_len);
    }

    #[test]
    fn successful_operations_move_balance_exactly(
        balance in cents(0..=1_000_000),
        amount in cents(1..=50_000),
    ) {
        let mut account = checking_with(balance, CheckingLimits::default());

        Transaction::deposit(amount, noon()).apply(&mut account).unwrap();
        prop_assert_eq!(account.balance(), balance + amount);

        Transaction::withdrawal(amount, noon()).apply(&mut account).unwrap();
        prop_assert_eq!(account.balance(), balance);
    }

    #[test]
    fn balance_never_goes_negative(
        balance in cents(0..=100_000),
        amount in cents(1..=200_000),
    ) {
        let mut account = Account::new(1, ClientId::new());
        if balance > Decimal::ZERO {
            account.deposit(balance).unwrap();
        }

        let result = account.withdraw(amount, noon().date());
        if amount > balance {
            let is_insufficient = matches!(result, Err(Error::InsufficientFunds { .. }));
            prop_assert!(is_insufficient);
            prop_assert_eq!(account.balance(), balance);
        } else {
            prop_assert!(result.is_ok());
            prop_assert_eq!(account.balance(), balance - amount);
        }
        prop_assert!(account.balance() >= Decimal::ZERO);
    }

    #[test]
    fn over_limit_fails_regardless_of_balance(
        balance in cents(0..=10_000_000),
        limit in cents(1..=100_000),
        excess in cents(1..=100_000),
    ) {
        let limits = CheckingLimits::new(limit, 3);
        let mut account = checking_with(balance, limits);

        let result = Transaction::withdrawal(limit + excess, noon()).apply(&mut account);
        let is_limit = matches!(result, Err(Error::LimitExceeded { .. }));
        prop_assert!(is_limit);
        prop_assert_eq!(account.balance(), balance);
    }

    #[test]
    fn nth_plus_one_withdrawal_same_day_fails(daily in 0u32..8) {
        let limits = CheckingLimits::new(Decimal::new(500, 0), daily);
        let mut account = checking_with(Decimal::new(1_000, 0), limits);

        for _ in 0..daily {
            Transaction::withdrawal(Decimal::ONE, noon()).apply(&mut account).unwrap();
        }
        let result = Transaction::withdrawal(Decimal::ONE, noon()).apply(&mut account);
        let is_quota = matches!(result, Err(Error::DailyQuotaExceeded { .. }));
        prop_assert!(is_quota);

        let tomorrow = noon() + chrono::Duration::days(1);
        let next_day = Transaction::withdrawal(Decimal::ONE, tomorrow).apply(&mut account);
        prop_assert_eq!(next_day.is_ok(), daily > 0);
    }
}
