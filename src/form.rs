//! Helpers for validating text submitted through HTML forms.

use std::str::FromStr;

use time::{Date, Time, macros::format_description};

use crate::Error;

/// Trim `value` and reject it if nothing is left.
///
/// `field` is the human readable field name used in the error message.
pub fn required_text(field: &'static str, value: &str) -> Result<String, Error> {
    let value = value.trim();

    if value.is_empty() {
        Err(Error::EmptyField(field))
    } else {
        Ok(value.to_owned())
    }
}

/// Trim `value`, treating blank text as missing.
pub fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();

    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

/// Parse the `HH:MM` value of a time input.
pub fn parse_time(field: &'static str, value: &str) -> Result<Time, Error> {
    let value = value.trim();

    if value.is_empty() {
        return Err(Error::EmptyField(field));
    }

    Time::parse(value, format_description!("[hour]:[minute]"))
        .or_else(|_| Time::parse(value, format_description!("[hour]:[minute]:[second]")))
        .map_err(|_| Error::InvalidChoice {
            kind: "time",
            value: value.to_owned(),
        })
}

/// Parse an optional time input. Blank text is `None`.
pub fn parse_optional_time(field: &'static str, value: &str) -> Result<Option<Time>, Error> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_time(field, value).map(Some)
    }
}

/// Formats a time of day as `HH:MM`.
pub fn format_time(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Parse an optional numeric id from a select input. Blank text is `None`.
pub fn parse_optional_id(field: &'static str, value: &str) -> Result<Option<i64>, Error> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(None);
    }

    value.parse().map(Some).map_err(|_| Error::InvalidChoice {
        kind: field,
        value: value.to_owned(),
    })
}

/// Parse an optional choice from a select input with a blank option. Blank text is `None`.
pub fn parse_optional_choice<T>(value: &str) -> Result<Option<T>, Error>
where
    T: FromStr<Err = Error>,
{
    let value = value.trim();

    if value.is_empty() {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

/// Parse an optional `YYYY-MM-DD` date, e.g. from a query string. Blank text is `None`.
pub fn parse_optional_date(value: &str) -> Result<Option<Date>, Error> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(None);
    }

    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map(Some)
        .map_err(|_| Error::InvalidChoice {
            kind: "date",
            value: value.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use time::macros::{date, time};

    use crate::{Error, finance::PaymentMethod};

    use super::{
        format_time, optional_text, parse_optional_choice, parse_optional_date,
        parse_optional_id, parse_time, required_text,
    };

    #[test]
    fn required_text_is_trimmed() {
        assert_eq!(required_text("Name", "  Ballet  "), Ok("Ballet".to_owned()));
    }

    #[test]
    fn blank_required_text_is_rejected() {
        assert_eq!(required_text("Name", "   "), Err(Error::EmptyField("Name")));
    }

    #[test]
    fn blank_optional_text_is_none() {
        assert_eq!(optional_text(""), None);
        assert_eq!(optional_text(" Room 2 "), Some("Room 2".to_owned()));
    }

    #[test]
    fn parses_time_inputs() {
        assert_eq!(parse_time("Start time", "18:30"), Ok(time!(18:30)));
        assert_eq!(parse_time("Start time", "09:15:00"), Ok(time!(09:15)));
        assert_eq!(format_time(time!(09:05)), "09:05");
    }

    #[test]
    fn rejects_bad_time_inputs() {
        assert_eq!(
            parse_time("Start time", ""),
            Err(Error::EmptyField("Start time"))
        );
        assert!(parse_time("Start time", "25:00").is_err());
    }

    #[test]
    fn parses_optional_ids() {
        assert_eq!(parse_optional_id("instructor", ""), Ok(None));
        assert_eq!(parse_optional_id("instructor", "3"), Ok(Some(3)));
        assert!(parse_optional_id("instructor", "three").is_err());
    }

    #[test]
    fn parses_optional_dates() {
        assert_eq!(parse_optional_date(""), Ok(None));
        assert_eq!(parse_optional_date("2024-03-01"), Ok(Some(date!(2024 - 03 - 01))));
        assert!(parse_optional_date("01/03/2024").is_err());
    }

    #[test]
    fn parses_optional_choices() {
        assert_eq!(parse_optional_choice::<PaymentMethod>(""), Ok(None));
        assert_eq!(
            parse_optional_choice("bank-transfer"),
            Ok(Some(PaymentMethod::BankTransfer))
        );
        assert_eq!(
            parse_optional_choice::<PaymentMethod>("barter"),
            Err(Error::InvalidChoice {
                kind: "payment method",
                value: "barter".to_owned(),
            })
        );
    }
}
