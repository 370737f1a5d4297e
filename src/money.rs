//! Parsing and storing money amounts.
//!
//! Amounts are stored as decimal text with two decimal places, e.g. "120.50".

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serializer;

use crate::Error;

/// The largest amount a user may enter, one billion dollars.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Parse an amount read back from the database.
///
/// Text that is not a valid decimal number counts as zero so that a single bad
/// row cannot break a report.
pub fn parse_amount(text: &str) -> Decimal {
    Decimal::from_str(text.trim()).unwrap_or_else(|error| {
        tracing::warn!("Could not parse the amount {text:?}, treating it as zero: {error}");
        Decimal::ZERO
    })
}

/// Parse an amount entered by a user.
///
/// # Errors
/// Returns [Error::InvalidAmount] if `text` is not a number, is negative or
/// is more than [MAX_AMOUNT].
pub fn parse_money_input(text: &str) -> Result<Decimal, Error> {
    let amount = Decimal::from_str(text.trim())
        .map_err(|_| Error::InvalidAmount(text.to_owned()))?;

    if (amount.is_sign_negative() && !amount.is_zero()) || amount > MAX_AMOUNT {
        return Err(Error::InvalidAmount(text.to_owned()));
    }

    Ok(amount.round_dp(2))
}

/// Parse an optional amount, e.g. a class's tuition fee. Blank text is `None`.
pub fn parse_optional_money_input(text: &str) -> Result<Option<Decimal>, Error> {
    if text.trim().is_empty() {
        Ok(None)
    } else {
        parse_money_input(text).map(Some)
    }
}

/// Add up `amounts`, failing instead of overflowing.
///
/// # Errors
/// Returns [Error::AmountOverflow] if the total does not fit in a [Decimal].
pub fn checked_total(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal, Error> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
        .ok_or(Error::AmountOverflow)
}

/// The text to store in the database for `amount`.
pub fn to_storage(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Serialize an amount as text with two decimal places, e.g. `"120.50"`.
pub fn serialize_amount<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_storage(*amount))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::Error;

    use super::{
        MAX_AMOUNT, checked_total, parse_amount, parse_money_input, parse_optional_money_input,
        serialize_amount, to_storage,
    };

    #[test]
    fn parses_stored_amounts() {
        assert_eq!(parse_amount("120.50"), dec!(120.50));
        assert_eq!(parse_amount(" 7 "), dec!(7));
    }

    #[test]
    fn malformed_amount_counts_as_zero() {
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount(""), Decimal::ZERO);
    }

    #[test]
    fn user_input_is_rounded_to_cents() {
        assert_eq!(parse_money_input("10.005"), Ok(dec!(10.00)));
        assert_eq!(parse_money_input("99.99"), Ok(dec!(99.99)));
    }

    #[test]
    fn rejects_negative_and_non_numeric_input() {
        assert_eq!(
            parse_money_input("-5"),
            Err(Error::InvalidAmount("-5".to_owned()))
        );
        assert_eq!(
            parse_money_input("ten"),
            Err(Error::InvalidAmount("ten".to_owned()))
        );
    }

    #[test]
    fn rejects_amounts_above_the_maximum() {
        assert_eq!(parse_money_input("1000000000"), Ok(MAX_AMOUNT));
        assert_eq!(
            parse_money_input("1000000000.01"),
            Err(Error::InvalidAmount("1000000000.01".to_owned()))
        );
        assert_eq!(
            parse_money_input("50000000000000000000000000000"),
            Err(Error::InvalidAmount(
                "50000000000000000000000000000".to_owned()
            ))
        );
    }

    #[test]
    fn totals_report_overflow_instead_of_panicking() {
        assert_eq!(checked_total([dec!(1.50), dec!(2.25)]), Ok(dec!(3.75)));
        assert_eq!(checked_total(Vec::new()), Ok(Decimal::ZERO));
        assert_eq!(
            checked_total([Decimal::MAX, Decimal::ONE]),
            Err(Error::AmountOverflow)
        );
    }

    #[test]
    fn blank_optional_amount_is_none() {
        assert_eq!(parse_optional_money_input("  "), Ok(None));
        assert_eq!(parse_optional_money_input("85"), Ok(Some(dec!(85))));
    }

    #[test]
    fn stores_two_decimal_places() {
        assert_eq!(to_storage(dec!(120.5)), "120.50");
        assert_eq!(to_storage(dec!(3)), "3.00");
    }

    #[test]
    fn serializes_amounts_as_text() {
        #[derive(serde::Serialize)]
        struct Total {
            #[serde(serialize_with = "serialize_amount")]
            amount: Decimal,
        }

        let json = serde_json::to_string(&Total { amount: dec!(45) }).unwrap();

        assert_eq!(json, r#"{"amount":"45.00"}"#);
    }
}
