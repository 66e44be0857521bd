//! Bill list controller.
//!
//! Loads the employee's bills, formats their date and status for display and
//! orders them most recent first. A record that cannot be formatted keeps its
//! raw values; it never prevents the rest of the list from loading.

use std::rc::Rc;

use log::{debug, info, warn};
use shared::{Bill, FormattedBill};

use crate::containers::ReceiptPreview;
use crate::errors::BillsError;
use crate::routes::{Navigator, Route};
use crate::services::format::{format_date, format_status};
use crate::services::store::BillStore;

pub struct BillsContainer {
    store: Option<Rc<dyn BillStore>>,
    navigator: Rc<dyn Navigator>,
    preview: Rc<dyn ReceiptPreview>,
}

impl BillsContainer {
    /// Build the controller. `store` is `None` when the page is rendered
    /// without a backend, in which case [`BillsContainer::load`] has nothing to do.
    pub fn new(
        store: Option<Rc<dyn BillStore>>,
        navigator: Rc<dyn Navigator>,
        preview: Rc<dyn ReceiptPreview>,
    ) -> Self {
        Self {
            store,
            navigator,
            preview,
        }
    }

    /// "New bill" button handler
    pub fn on_new_bill_requested(&self) {
        self.navigator.navigate(Route::NewBill);
    }

    /// Eye icon handler: show the bill's receipt
    pub fn on_receipt_preview_requested(&self, receipt_url: &str) {
        self.preview.present_receipt(receipt_url);
    }

    /// Order bills by date, most recent first.
    ///
    /// Bills sharing a date keep their relative order. Bills whose date cannot
    /// be parsed go last.
    pub fn sort_descending<T: AsRef<Bill>>(bills: &mut [T]) {
        bills.sort_by(|a, b| b.as_ref().parsed_date().cmp(&a.as_ref().parsed_date()));
    }

    /// Fetch, format and order the bills for display.
    ///
    /// Returns `Ok(None)` when no store is configured. Store failures are
    /// returned unchanged and never retried.
    pub async fn load(&self) -> Result<Option<Vec<FormattedBill>>, BillsError> {
        let Some(store) = &self.store else {
            debug!("No store configured, skipping bill listing");
            return Ok(None);
        };

        let bills = store.list().await?;
        let mut formatted: Vec<FormattedBill> = bills.into_iter().map(format_bill).collect();

        Self::sort_descending(&mut formatted);

        for entry in formatted.iter_mut() {
            entry.bill.date = entry.formatted_date.clone();
            entry.bill.status = entry.formatted_status.clone();
        }

        info!("Loaded {} bills", formatted.len());
        Ok(Some(formatted))
    }
}

/// Compute display values, falling back to the raw ones if either fails
fn format_bill(bill: Bill) -> FormattedBill {
    let formatted = format_date(&bill.date)
        .and_then(|date| Ok((date, format_status(&bill.status)?)));
    let (formatted_date, formatted_status) = match formatted {
        Ok(values) => values,
        Err(e) => {
            warn!("{} for bill {}", e, bill.id);
            (bill.date.clone(), bill.status.clone())
        }
    };

    FormattedBill {
        bill,
        formatted_date,
        formatted_status,
    }
}
