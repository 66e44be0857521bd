//! In-memory collaborators for controller tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use shared::{Bill, CreateBillResponse};
use tokio::sync::Notify;

use crate::containers::{LocalTask, NewBillForm, ReceiptPreview, Spawner, SubmitEvent};
use crate::errors::StoreError;
use crate::routes::{Navigator, Route};
use crate::services::store::{BillStore, CreateBillRequest, UpdateBillRequest};

/// The four bills every listing test starts from
pub fn fixture_bills() -> Vec<Bill> {
    let bill = |id: &str, date: &str, status: &str, name: &str, amount: f64| Bill {
        id: id.to_string(),
        date: date.to_string(),
        status: status.to_string(),
        amount: Some(amount),
        vat: "80".to_string(),
        pct: Some(20),
        name: name.to_string(),
        expense_type: "Transports".to_string(),
        commentary: String::new(),
        comment_admin: None,
        email: "a@a".to_string(),
        file_url: Some(format!("https://test.storage.tld/v0/b/billable/{}.jpg", name)),
        file_name: Some(format!("{}.jpg", name)),
    };

    vec![
        bill("47qAXb6fIm2zOKkLzMro", "2004-04-04", "pending", "encore", 400.0),
        bill("BeKy5Mo4jkmdfPGYpTxZ", "2001-01-01", "refused", "test1", 100.0),
        bill("UIUZtnPQvnbFnB0ozvJh", "2003-03-03", "accepted", "test3", 300.0),
        bill("qcCK3SzECmaZAGRrHjaC", "2002-02-02", "refused", "test2", 200.0),
    ]
}

/// Outcome of one upload, optionally held until `gate` is notified
struct ScriptedCreate {
    result: Result<CreateBillResponse, StoreError>,
    gate: Option<Rc<Notify>>,
}

pub fn upload_response(key: &str) -> CreateBillResponse {
    CreateBillResponse {
        file_url: format!("http://x/{}.png", key),
        key: key.to_string(),
    }
}

/// Bill store double recording every request it receives
pub struct MockBillStore {
    bills: Vec<Bill>,
    list_error: Option<StoreError>,
    create_result: Result<CreateBillResponse, StoreError>,
    create_gate: Option<Rc<Notify>>,
    scripted_creates: RefCell<VecDeque<ScriptedCreate>>,
    update_error: Option<StoreError>,
    list_calls: Cell<usize>,
    create_requests: RefCell<Vec<CreateBillRequest>>,
    update_requests: RefCell<Vec<UpdateBillRequest>>,
}

impl MockBillStore {
    pub fn new() -> Self {
        Self::with_bills(fixture_bills())
    }

    pub fn with_bills(bills: Vec<Bill>) -> Self {
        Self {
            bills,
            list_error: None,
            create_result: Ok(CreateBillResponse {
                file_url: "https://localhost:3456/images/test.jpg".to_string(),
                key: "1234".to_string(),
            }),
            create_gate: None,
            scripted_creates: RefCell::new(VecDeque::new()),
            update_error: None,
            list_calls: Cell::new(0),
            create_requests: RefCell::new(Vec::new()),
            update_requests: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_list(mut self, error: StoreError) -> Self {
        self.list_error = Some(error);
        self
    }

    pub fn creating(mut self, response: CreateBillResponse) -> Self {
        self.create_result = Ok(response);
        self
    }

    pub fn failing_create(mut self, error: StoreError) -> Self {
        self.create_result = Err(error);
        self
    }

    /// Hold every upload until `gate` is notified
    pub fn gated_create(mut self, gate: Rc<Notify>) -> Self {
        self.create_gate = Some(gate);
        self
    }

    /// Queue the outcome of one upload; queued outcomes are used in call order
    pub fn then_create(self, result: Result<CreateBillResponse, StoreError>) -> Self {
        self.scripted_creates
            .borrow_mut()
            .push_back(ScriptedCreate { result, gate: None });
        self
    }

    /// Like `then_create`, holding the upload until `gate` is notified
    pub fn then_create_after(
        self,
        gate: Rc<Notify>,
        result: Result<CreateBillResponse, StoreError>,
    ) -> Self {
        self.scripted_creates.borrow_mut().push_back(ScriptedCreate {
            result,
            gate: Some(gate),
        });
        self
    }

    pub fn failing_update(mut self, error: StoreError) -> Self {
        self.update_error = Some(error);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    pub fn create_requests(&self) -> Vec<CreateBillRequest> {
        self.create_requests.borrow().clone()
    }

    pub fn update_requests(&self) -> Vec<UpdateBillRequest> {
        self.update_requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl BillStore for MockBillStore {
    async fn list(&self) -> Result<Vec<Bill>, StoreError> {
        self.list_calls.set(self.list_calls.get() + 1);
        match &self.list_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.bills.clone()),
        }
    }

    async fn create(&self, request: CreateBillRequest) -> Result<CreateBillResponse, StoreError> {
        self.create_requests.borrow_mut().push(request);
        let scripted = self.scripted_creates.borrow_mut().pop_front();
        if let Some(ScriptedCreate { result, gate }) = scripted {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            return result;
        }
        if let Some(gate) = &self.create_gate {
            gate.notified().await;
        }
        self.create_result.clone()
    }

    async fn update(&self, request: UpdateBillRequest) -> Result<Bill, StoreError> {
        let id = request.selector.clone().unwrap_or_default();
        self.update_requests.borrow_mut().push(request);
        match &self.update_error {
            Some(error) => Err(error.clone()),
            None => Ok(Bill {
                id,
                ..Bill::default()
            }),
        }
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: RefCell<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.borrow_mut().push(route);
    }
}

#[derive(Default)]
pub struct RecordingPreview {
    presented: RefCell<Vec<String>>,
}

impl RecordingPreview {
    pub fn presented(&self) -> Vec<String> {
        self.presented.borrow().clone()
    }
}

impl ReceiptPreview for RecordingPreview {
    fn present_receipt(&self, receipt_url: &str) {
        self.presented.borrow_mut().push(receipt_url.to_string());
    }
}

/// Submit event counting how often the default action was prevented
pub struct TestSubmitEvent {
    form: NewBillForm,
    prevented: Cell<usize>,
}

impl TestSubmitEvent {
    pub fn new(form: NewBillForm) -> Self {
        Self {
            form,
            prevented: Cell::new(0),
        }
    }

    pub fn prevented(&self) -> usize {
        self.prevented.get()
    }
}

impl SubmitEvent for TestSubmitEvent {
    fn prevent_default(&self) {
        self.prevented.set(self.prevented.get() + 1);
    }

    fn form(&self) -> NewBillForm {
        self.form.clone()
    }
}

/// Spawns onto the enclosing `tokio::task::LocalSet`
pub struct TokioSpawner;

impl Spawner for TokioSpawner {
    fn spawn(&self, task: LocalTask) {
        tokio::task::spawn_local(task);
    }
}

/// Give spawned local tasks a chance to run to completion
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
