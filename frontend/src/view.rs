//! DOM bindings for the employee bill pages.
//!
//! The controllers never touch the page. This module reads what they need
//! from the rendered markup and forwards browser events to their handlers.
//! Listeners stay attached for as long as the returned [`ViewBindings`] lives.

use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

use crate::containers::{
    BillsContainer, FileSelection, NewBillContainer, NewBillForm, ReceiptPreview, SubmitEvent,
};
use crate::errors::ViewError;
use crate::services::store::ReceiptFile;

const NEW_BILL_BUTTON: &str = r#"button[data-testid="btn-new-bill"]"#;
const EYE_ICON: &str = r#"div[data-testid="icon-eye"]"#;
const RECEIPT_INPUT: &str = r#"input[data-testid="file"]"#;
const NEW_BILL_FORM: &str = r#"form[data-testid="form-new-bill"]"#;
const RECEIPT_MODAL_ID: &str = "modaleFile";

/// Event listeners attached to a page
pub struct ViewBindings {
    listeners: Vec<EventListener>,
}

impl ViewBindings {
    /// Number of attached listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

fn query(root: &Document, selector: &str) -> Result<Option<Element>, ViewError> {
    root.query_selector(selector)
        .map_err(|_| ViewError::Selector(selector.to_string()))
}

fn query_all(root: &Document, selector: &str) -> Result<Vec<Element>, ViewError> {
    let nodes = root
        .query_selector_all(selector)
        .map_err(|_| ViewError::Selector(selector.to_string()))?;
    Ok((0..nodes.length())
        .filter_map(|index| nodes.get(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Bind the bill list's "new bill" button and eye icons.
///
/// Either element may be missing, for instance while the list is still
/// loading; nothing is attached for it then.
pub fn attach_bills(
    document: &Document,
    container: Rc<BillsContainer>,
) -> Result<ViewBindings, ViewError> {
    let mut listeners = Vec::new();

    if let Some(button) = query(document, NEW_BILL_BUTTON)? {
        let container = container.clone();
        listeners.push(EventListener::new(&button, "click", move |_| {
            container.on_new_bill_requested();
        }));
    }

    for icon in query_all(document, EYE_ICON)? {
        let container = container.clone();
        let target = icon.clone();
        listeners.push(EventListener::new(&icon, "click", move |_| {
            match target.get_attribute("data-bill-url") {
                Some(url) => container.on_receipt_preview_requested(&url),
                None => warn!("Eye icon without a receipt URL"),
            }
        }));
    }

    debug!("Attached {} bill list listeners", listeners.len());
    Ok(ViewBindings { listeners })
}

/// Bind the new bill page's receipt input and form.
pub fn attach_new_bill(
    document: &Document,
    container: Rc<NewBillContainer>,
) -> Result<ViewBindings, ViewError> {
    let mut listeners = Vec::new();

    let receipt_input = query(document, RECEIPT_INPUT)?
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok());
    if let Some(input) = receipt_input {
        let container = container.clone();
        let target = input.clone();
        listeners.push(EventListener::new(&input, "change", move |_| {
            let selection = FileSelection::from_input(&target);
            if let Err(e) = container.on_file_selected(&selection) {
                warn!("Receipt rejected: {}", e);
                target.set_value("");
            }
        }));
    }

    let form = query(document, NEW_BILL_FORM)?
        .and_then(|element| element.dyn_into::<HtmlFormElement>().ok());
    if let Some(form) = form {
        let target = form.clone();
        listeners.push(EventListener::new_with_options(
            &form,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let submit = DomSubmitEvent::new(event.clone(), target.clone());
                container.on_submit(&submit);
            },
        ));
    }

    debug!("Attached {} new bill listeners", listeners.len());
    Ok(ViewBindings { listeners })
}

impl FileSelection {
    /// Read the receipt input's first file and raw value
    pub fn from_input(input: &HtmlInputElement) -> Self {
        let file = input
            .files()
            .and_then(|files| files.get(0))
            .map(|file| ReceiptFile::from_web_file(&file));
        Self {
            file,
            value: input.value(),
        }
    }
}

/// Submit event of the rendered new bill form
pub struct DomSubmitEvent {
    event: Event,
    form: HtmlFormElement,
}

impl DomSubmitEvent {
    pub fn new(event: Event, form: HtmlFormElement) -> Self {
        Self { event, form }
    }
}

impl SubmitEvent for DomSubmitEvent {
    fn prevent_default(&self) {
        self.event.prevent_default();
    }

    fn form(&self) -> NewBillForm {
        read_new_bill_form(&self.form)
    }
}

/// Current values of the new bill form's fields; a missing field reads empty
pub fn read_new_bill_form(form: &HtmlFormElement) -> NewBillForm {
    let field = |test_id: &str| {
        let selector = format!(r#"[data-testid="{}"]"#, test_id);
        match form.query_selector(&selector) {
            Ok(Some(element)) => field_value(&element),
            _ => {
                warn!("New bill form has no {} field", test_id);
                String::new()
            }
        }
    };

    NewBillForm {
        expense_type: field("expense-type"),
        name: field("expense-name"),
        amount: field("amount"),
        date: field("datepicker"),
        vat: field("vat"),
        pct: field("pct"),
        commentary: field("commentary"),
    }
}

fn field_value(element: &Element) -> String {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
        textarea.value()
    } else {
        String::new()
    }
}

/// Shows receipts in the page's `#modaleFile` dialog
pub struct ModalPreview {
    document: Document,
}

impl ModalPreview {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl ReceiptPreview for ModalPreview {
    fn present_receipt(&self, receipt_url: &str) {
        let Some(modal) = self.document.get_element_by_id(RECEIPT_MODAL_ID) else {
            warn!("No receipt dialog on the page");
            return;
        };
        let width = modal
            .dyn_ref::<HtmlElement>()
            .map(|modal| modal.offset_width() / 2)
            .unwrap_or_default();

        if let Ok(Some(body)) = modal.query_selector(".modal-body") {
            body.set_inner_html(&format!(
                concat!(
                    r#"<div style="text-align: center;" class="bill-proof-container">"#,
                    r#"<img width="{}" src="{}" alt="Bill" /></div>"#,
                ),
                width, receipt_url
            ));
        }
        if let Err(e) = modal.class_list().add_1("show") {
            warn!("Failed to show receipt dialog: {:?}", e);
        }
        if let Err(e) = modal.set_attribute("style", "display: block;") {
            warn!("Failed to show receipt dialog: {:?}", e);
        }
    }
}
