use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use chrono::NaiveDate;

/// An expense report as stored by the bill service.
///
/// `date` and `status` are kept as the raw strings the service returned so a
/// single malformed record never prevents the rest of a listing from loading.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bill {
    /// Assigned by the service when the receipt is uploaded
    pub id: String,
    /// ISO-8601 date (YYYY-MM-DD) as entered by the employee
    pub date: String,
    /// Raw status code: pending, accepted or refused
    pub status: String,
    /// Absent when the employee entered no usable amount
    pub amount: Option<f64>,
    /// VAT amount as entered, may be empty
    pub vat: String,
    /// VAT percentage, stored as sent by the client
    pub pct: Option<i64>,
    pub name: String,
    #[serde(rename = "type")]
    pub expense_type: String,
    pub commentary: String,
    /// Comment left by the administrator reviewing the bill
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_admin: Option<String>,
    pub email: String,
    /// Public URL of the uploaded receipt, absent until the upload completes
    pub file_url: Option<String>,
    pub file_name: Option<String>,
}

impl Bill {
    /// Calendar date of the bill, if `date` holds a YYYY-MM-DD value or an
    /// RFC 3339 timestamp.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_bill_date(&self.date)
    }
}

impl AsRef<Bill> for Bill {
    fn as_ref(&self) -> &Bill {
        self
    }
}

/// Parse the date part of a raw bill date.
pub fn parse_bill_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split('T').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Review status of a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Accepted => "accepted",
            BillStatus::Refused => "refused",
        }
    }

    /// Label shown to employees in the bill table
    pub fn label(&self) -> &'static str {
        match self {
            BillStatus::Pending => "En attente",
            BillStatus::Accepted => "Accepté",
            BillStatus::Refused => "Refused",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BillStatus::Pending),
            "accepted" => Ok(BillStatus::Accepted),
            "refused" => Ok(BillStatus::Refused),
            other => Err(format!("Unknown bill status: {}", other)),
        }
    }
}

/// A bill prepared for display.
///
/// `bill.date` and `bill.status` hold the display values once the listing is
/// complete; `formatted_date` and `formatted_status` repeat them. Never sent
/// back to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedBill {
    #[serde(flatten)]
    pub bill: Bill,
    pub formatted_date: String,
    pub formatted_status: String,
}

impl AsRef<Bill> for FormattedBill {
    fn as_ref(&self) -> &Bill {
        &self.bill
    }
}

/// Response of the receipt upload: the new record's key and receipt URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillResponse {
    pub file_url: String,
    pub key: String,
}

/// Metadata attached to an uploaded receipt when the employee submits the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBillPayload {
    pub email: String,
    #[serde(rename = "type")]
    pub expense_type: String,
    pub name: String,
    pub amount: Option<i64>,
    pub date: String,
    pub vat: String,
    pub pct: i64,
    pub commentary: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub status: BillStatus,
}

impl NewBillPayload {
    /// VAT percentage applied when the form leaves it blank
    pub const DEFAULT_PCT: i64 = 20;

    /// JSON body sent as the update request's data
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
