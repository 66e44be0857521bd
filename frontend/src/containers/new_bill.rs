//! New bill controller.
//!
//! A bill is created in two phases. Selecting a receipt uploads it right away,
//! which allocates the record and returns its key and receipt URL. Submitting
//! the form then attaches the metadata to that record and returns to the bill
//! list.
//!
//! ## Phases
//!
//! | from            | event             | to              |
//! |-----------------|-------------------|-----------------|
//! | any but final   | valid file chosen | `Uploading`     |
//! | `Uploading`     | upload resolved   | `ReadyToSubmit` |
//! | `Uploading`     | upload failed     | `Idle`          |
//! | any but final   | form submitted    | `Submitting`    |
//! | `Submitting`    | update dispatched | `Navigated`     |
//!
//! An invalid selection leaves the phase untouched. `Navigated` is final: the
//! page is gone and late store results change nothing visible.
//!
//! Only the most recent selection counts. Each upload is tagged when it is
//! dispatched and the result of an upload superseded by a later selection is
//! dropped, whether it succeeded or failed.
//!
//! Submitting does not wait for the upload. If the employee submits before
//! the upload resolves, or without choosing a file, the update is sent with
//! no record key. This mirrors how the page has always behaved and is logged
//! rather than rejected.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, error, info, warn};
use shared::{BillStatus, CreateBillResponse, NewBillPayload};

use crate::containers::Spawner;
use crate::errors::NewBillError;
use crate::routes::{Navigator, Route};
use crate::services::session::Session;
use crate::services::store::{
    BillStore, CreateBillRequest, ReceiptFile, ReceiptUpload, RequestHeaders, UpdateBillRequest,
};

/// Receipt extensions accepted by the bill service
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpeg", "jpg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewBillPhase {
    Idle,
    Uploading,
    ReadyToSubmit,
    Submitting,
    Navigated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewBillTransition {
    FileAccepted,
    UploadResolved,
    UploadFailed,
    Submitted,
    UpdateDispatched,
}

impl NewBillPhase {
    pub fn next(self, transition: NewBillTransition) -> NewBillPhase {
        use NewBillPhase::*;
        use NewBillTransition::*;

        match (self, transition) {
            (Navigated, _) => Navigated,
            (_, FileAccepted) => Uploading,
            (Uploading, UploadResolved) => ReadyToSubmit,
            (Uploading, UploadFailed) => Idle,
            (_, Submitted) => Submitting,
            (Submitting, UpdateDispatched) => Navigated,
            (phase, _) => phase,
        }
    }
}

/// What the controller remembers between the upload and the submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBillState {
    pub phase: NewBillPhase,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub bill_id: Option<String>,
}

impl Default for NewBillState {
    fn default() -> Self {
        Self {
            phase: NewBillPhase::Idle,
            file_url: None,
            file_name: None,
            bill_id: None,
        }
    }
}

impl NewBillState {
    fn apply(&mut self, transition: NewBillTransition) {
        self.phase = self.phase.next(transition);
    }

    fn record_upload(&mut self, response: CreateBillResponse, file_name: String) {
        self.file_url = Some(response.file_url);
        self.file_name = Some(file_name);
        self.bill_id = Some(response.key);
        self.apply(NewBillTransition::UploadResolved);
    }

    fn discard_upload(&mut self) {
        if self.phase == NewBillPhase::Navigated {
            return;
        }
        self.file_url = None;
        self.file_name = None;
        self.bill_id = None;
        self.apply(NewBillTransition::UploadFailed);
    }
}

/// Change event of the receipt input
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileSelection {
    /// First file attached to the input, if any
    pub file: Option<ReceiptFile>,
    /// Raw input value, often a placeholder such as `C:\fakepath\receipt.png`
    pub value: String,
}

/// Raw field values of the new bill form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewBillForm {
    pub expense_type: String,
    pub name: String,
    pub amount: String,
    pub date: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

/// Submit event of the new bill form
pub trait SubmitEvent {
    /// Stop the browser from performing a native form submission
    fn prevent_default(&self);

    fn form(&self) -> NewBillForm;
}

pub struct NewBillContainer {
    store: Rc<dyn BillStore>,
    session: Session,
    navigator: Rc<dyn Navigator>,
    spawner: Rc<dyn Spawner>,
    state: Rc<RefCell<NewBillState>>,
    /// Tag of the latest dispatched upload
    uploads: Rc<Cell<u64>>,
}

impl NewBillContainer {
    pub fn new(
        store: Rc<dyn BillStore>,
        session: Session,
        navigator: Rc<dyn Navigator>,
        spawner: Rc<dyn Spawner>,
    ) -> Self {
        Self {
            store,
            session,
            navigator,
            spawner,
            state: Rc::new(RefCell::new(NewBillState::default())),
            uploads: Rc::new(Cell::new(0)),
        }
    }

    pub fn state(&self) -> NewBillState {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> NewBillPhase {
        self.state.borrow().phase
    }

    pub fn file_url(&self) -> Option<String> {
        self.state.borrow().file_url.clone()
    }

    pub fn file_name(&self) -> Option<String> {
        self.state.borrow().file_name.clone()
    }

    pub fn bill_id(&self) -> Option<String> {
        self.state.borrow().bill_id.clone()
    }

    /// Receipt input change handler.
    ///
    /// Validates the selected file and starts its upload. Returns once the
    /// upload is dispatched; its outcome only shows in the controller state.
    pub fn on_file_selected(&self, selection: &FileSelection) -> Result<(), NewBillError> {
        let file = selection.file.as_ref().ok_or(NewBillError::MissingFile)?;
        validate_receipt(file)?;
        debug!("Receipt {} selected from {:?}", file.name, selection.value);

        self.state.borrow_mut().apply(NewBillTransition::FileAccepted);

        let request = CreateBillRequest {
            data: ReceiptUpload {
                file: file.clone(),
                email: self.session.email.clone(),
            },
            headers: RequestHeaders { no_content_type: true },
        };
        let file_name = file.name.clone();
        let store = self.store.clone();
        let state = self.state.clone();
        let uploads = self.uploads.clone();
        let generation = uploads.get() + 1;
        uploads.set(generation);

        self.spawner.spawn(Box::pin(async move {
            let result = store.create(request).await;
            if uploads.get() != generation {
                debug!("Dropping result of superseded upload of {}", file_name);
                return;
            }
            match result {
                Ok(response) => {
                    info!("Uploaded receipt {} as bill {}", file_name, response.key);
                    state.borrow_mut().record_upload(response, file_name);
                }
                Err(e) => {
                    error!("Failed to upload receipt {}: {}", file_name, e);
                    state.borrow_mut().discard_upload();
                }
            }
        }));

        Ok(())
    }

    /// Form submit handler.
    ///
    /// Sends the bill metadata for the uploaded record and returns to the bill
    /// list without waiting for the update to complete.
    pub fn on_submit(&self, event: &dyn SubmitEvent) {
        event.prevent_default();

        let form = event.form();
        let (file_url, file_name, bill_id) = {
            let mut state = self.state.borrow_mut();
            if state.bill_id.is_none() {
                warn!("Submitting bill while no uploaded receipt is recorded ({:?})", state.phase);
            }
            state.apply(NewBillTransition::Submitted);
            (state.file_url.clone(), state.file_name.clone(), state.bill_id.clone())
        };

        let payload = NewBillPayload {
            email: self.session.email.clone(),
            expense_type: form.expense_type,
            name: form.name,
            amount: parse_int_prefix(&form.amount),
            date: form.date,
            vat: form.vat,
            pct: parse_pct(&form.pct),
            commentary: form.commentary,
            file_url,
            file_name,
            status: BillStatus::Pending,
        };

        match payload.to_json() {
            Ok(data) => self.dispatch_update(UpdateBillRequest { data, selector: bill_id }),
            Err(e) => error!("Failed to encode bill: {}", e),
        }

        self.state.borrow_mut().apply(NewBillTransition::UpdateDispatched);
        self.navigator.navigate(Route::Bills);
    }

    fn dispatch_update(&self, request: UpdateBillRequest) {
        let store = self.store.clone();
        self.spawner.spawn(Box::pin(async move {
            let selector = request.selector.clone();
            match store.update(request).await {
                Ok(bill) => info!("Submitted bill {}", bill.id),
                Err(e) => error!("Failed to submit bill {:?}: {}", selector, e),
            }
        }));
    }
}

/// Check the receipt's own file name against the supported extensions
fn validate_receipt(file: &ReceiptFile) -> Result<(), NewBillError> {
    match file.extension() {
        Some(extension) if SUPPORTED_EXTENSIONS.contains(&extension.as_str()) => Ok(()),
        _ => Err(NewBillError::UnsupportedFileType {
            file_name: file.name.clone(),
        }),
    }
}

/// Leading integer of a form value ("12.5" -> 12), `None` when there is none.
///
/// Digit runs too long for an `i64` saturate to `i64::MAX` or `i64::MIN`.
fn parse_int_prefix(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let digits_start = usize::from(trimmed.starts_with(['-', '+']));
    let digits_len = trimmed[digits_start..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits_len == 0 {
        return None;
    }
    match trimmed[..digits_start + digits_len].parse::<i64>() {
        Ok(number) => Some(number),
        Err(_) if trimmed.starts_with('-') => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}

/// VAT percentage of the form; blank, zero or non-numeric means the default
fn parse_pct(value: &str) -> i64 {
    parse_int_prefix(value)
        .filter(|pct| *pct != 0)
        .unwrap_or(NewBillPayload::DEFAULT_PCT)
}
