use chrono::Datelike;
use shared::{parse_bill_date, BillStatus};

use crate::errors::FormatError;

/// Abbreviated French month name as displayed in the bill table
fn month_abbreviation(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Fév",
        3 => "Mar",
        4 => "Avr",
        5 => "Mai",
        6 | 7 => "Jui",
        8 => "Aoû",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Déc",
        _ => "Jan",
    }
}

/// Format a raw bill date for display (e.g., "2004-04-04" -> "4 Avr. 04")
pub fn format_date(raw: &str) -> Result<String, FormatError> {
    let date = parse_bill_date(raw).ok_or_else(|| FormatError::InvalidDate(raw.to_string()))?;
    Ok(format!(
        "{} {}. {:02}",
        date.day(),
        month_abbreviation(date.month()),
        date.year().rem_euclid(100)
    ))
}

/// Format a raw status code for display (e.g., "pending" -> "En attente")
pub fn format_status(raw: &str) -> Result<String, FormatError> {
    raw.parse::<BillStatus>()
        .map(|status| status.label().to_string())
        .map_err(|_| FormatError::UnknownStatus(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2004-04-04").unwrap(), "4 Avr. 04");
        assert_eq!(format_date("2001-01-01").unwrap(), "1 Jan. 01");
        assert_eq!(format_date("2022-12-25").unwrap(), "25 Déc. 22");
        assert_eq!(format_date("2023-08-15T09:30:00Z").unwrap(), "15 Aoû. 23");
    }

    #[test]
    fn test_format_date_rejects_malformed_input() {
        assert_eq!(
            format_date("04/04/2004"),
            Err(FormatError::InvalidDate("04/04/2004".to_string()))
        );
        assert!(format_date("").is_err());
        assert!(format_date("2004-02-30").is_err());
    }

    #[test]
    fn test_format_status() {
        assert_eq!(format_status("pending").unwrap(), "En attente");
        assert_eq!(format_status("accepted").unwrap(), "Accepté");
        assert_eq!(format_status("refused").unwrap(), "Refused");
        assert_eq!(
            format_status("archived"),
            Err(FormatError::UnknownStatus("archived".to_string()))
        );
    }
}
