//! Page controllers for the employee bill screens.
//!
//! A controller is built with its collaborators (store, session, navigator)
//! and knows nothing about the DOM; [`crate::view`] attaches its handlers to
//! elements as a separate step.

use std::future::Future;
use std::pin::Pin;

pub mod bills;
pub mod new_bill;

pub use bills::BillsContainer;
pub use new_bill::{
    FileSelection, NewBillContainer, NewBillForm, NewBillPhase, NewBillState, NewBillTransition,
    SubmitEvent,
};

/// A detached store call whose outcome is only observed through controller state
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Runs fire-and-forget tasks on the current thread
pub trait Spawner {
    fn spawn(&self, task: LocalTask);
}

/// Spawner backed by the browser's microtask queue
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSpawner;

impl Spawner for BrowserSpawner {
    fn spawn(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

/// Shows a receipt image to the user, typically in a modal
pub trait ReceiptPreview {
    fn present_receipt(&self, receipt_url: &str);
}
