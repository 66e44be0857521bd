//! Employee side of the Billed expense report application.
//!
//! The bill list and new bill controllers live in [`containers`]; they talk
//! to the bill service through the [`services::store::BillStore`] trait and
//! never touch the DOM; [`view`] attaches their handlers to the rendered
//! pages. The functions below wire everything to the browser.

use std::rc::Rc;

pub mod containers;
pub mod errors;
pub mod routes;
pub mod services;
pub mod view;

#[cfg(all(test, not(target_arch = "wasm32")))]
pub(crate) mod test_utils;

use containers::{BillsContainer, BrowserSpawner, NewBillContainer, ReceiptPreview};
use errors::ViewError;
use routes::HashNavigator;
use services::api::ApiClient;
use services::logging::ConsoleLogger;
use services::session::Session;
use services::store::BillStore;
use view::{attach_bills, attach_new_bill, ModalPreview, ViewBindings};
use web_sys::Document;

/// Route `log` output to the browser console
pub fn init_logging() {
    if let Err(e) = ConsoleLogger::init(log::LevelFilter::Info) {
        gloo::console::warn!(format!("Logger already installed: {}", e));
    }
}

fn browser_store() -> ApiClient {
    ApiClient::new().with_stored_token()
}

/// Bill list controller backed by the bill service and the page's hash router
pub fn browser_bills_container(preview: Rc<dyn ReceiptPreview>) -> BillsContainer {
    let store: Rc<dyn BillStore> = Rc::new(browser_store());
    BillsContainer::new(Some(store), Rc::new(HashNavigator), preview)
}

/// New bill controller for the connected user, `None` when nobody is logged in
pub fn browser_new_bill_container() -> Option<NewBillContainer> {
    let session = Session::from_local_storage()?;
    Some(NewBillContainer::new(
        Rc::new(browser_store()),
        session,
        Rc::new(HashNavigator),
        Rc::new(BrowserSpawner),
    ))
}

fn browser_document() -> Result<Document, ViewError> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or(ViewError::NoDocument)
}

/// Attach the bill list controller to the rendered bill list page.
///
/// The returned bindings must be kept alive as long as the page is shown.
pub fn mount_bills_page() -> Result<(Rc<BillsContainer>, ViewBindings), ViewError> {
    let document = browser_document()?;
    let preview = Rc::new(ModalPreview::new(document.clone()));
    let container = Rc::new(browser_bills_container(preview));
    let bindings = attach_bills(&document, container.clone())?;
    Ok((container, bindings))
}

/// Attach the new bill controller to the rendered form, `Ok(None)` when
/// nobody is logged in.
pub fn mount_new_bill_page() -> Result<Option<(Rc<NewBillContainer>, ViewBindings)>, ViewError> {
    let document = browser_document()?;
    let Some(container) = browser_new_bill_container() else {
        log::warn!("No connected user, new bill form left inert");
        return Ok(None);
    };
    let container = Rc::new(container);
    let bindings = attach_new_bill(&document, container.clone())?;
    Ok(Some((container, bindings)))
}
