use std::sync::Arc;

use client_core::{ClientError, ErrorKind, LaptopService, Result};
use shared::{
    domain::{LaptopId, LaptopRecord},
    draft::{DraftField, LaptopDraft},
};

use super::{
    events::Outcome,
    state::{FetchTicket, Mutation, PageError, PageState, Tickets},
};
use crate::router::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(LaptopId),
}

#[derive(Debug, PartialEq)]
pub enum FormView<'a> {
    Loading,
    NotFound,
    Ready(&'a LaptopDraft),
}

/// Shared create/edit form. The create form starts ready on an empty draft;
/// the edit form prefills from the server first.
pub struct FormController {
    service: Arc<dyn LaptopService>,
    mode: FormMode,
    state: PageState<LaptopDraft>,
    tickets: Tickets,
}

impl FormController {
    pub fn new_create(service: Arc<dyn LaptopService>) -> Self {
        Self {
            service,
            mode: FormMode::Create,
            state: PageState::ready(LaptopDraft::default()),
            tickets: Tickets::default(),
        }
    }

    pub fn new_edit(service: Arc<dyn LaptopService>, id: LaptopId) -> Self {
        Self {
            service,
            mode: FormMode::Edit(id),
            state: PageState::default(),
            tickets: Tickets::default(),
        }
    }

    pub fn service(&self) -> Arc<dyn LaptopService> {
        Arc::clone(&self.service)
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn state(&self) -> &PageState<LaptopDraft> {
        &self.state
    }

    pub fn draft(&self) -> &LaptopDraft {
        self.state.data()
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add New Laptop",
            FormMode::Edit(_) => "Edit Laptop",
        }
    }

    pub fn begin_load(&mut self, id: LaptopId) -> FetchTicket {
        if self.mode != FormMode::Edit(id.clone()) {
            self.state.reset(LaptopDraft::default());
            self.mode = FormMode::Edit(id.clone());
        }
        self.state.begin_fetch();
        self.tickets.issue(id)
    }

    pub fn complete_load(&mut self, ticket: FetchTicket, result: Result<LaptopRecord>) -> bool {
        if !self.tickets.is_current(&ticket) {
            return false;
        }
        match result {
            Ok(laptop) => self.state.loaded(LaptopDraft::from(laptop)),
            Err(err) => self.state.failed(&err),
        }
        true
    }

    pub async fn load(&mut self) {
        let FormMode::Edit(id) = self.mode.clone() else {
            return;
        };
        let ticket = self.begin_load(id);
        let result = self.service.get_by_id(ticket.id()).await;
        self.complete_load(ticket, result);
    }

    pub fn view(&self) -> FormView<'_> {
        if self.state.loading() {
            return FormView::Loading;
        }
        match self.state.error() {
            Some(err) if err.kind == ErrorKind::NotFound => FormView::NotFound,
            _ => FormView::Ready(self.state.data()),
        }
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.state.data_mut().set(field, value);
    }

    pub fn set_available(&mut self, available: bool) {
        self.state.data_mut().is_available = available;
    }

    pub fn fill_sample(&mut self) {
        let extra = std::mem::take(&mut self.state.data_mut().extra);
        *self.state.data_mut() = LaptopDraft {
            extra,
            ..LaptopDraft::sample()
        };
    }

    pub fn can_submit(&self) -> bool {
        self.state.submit_enabled() && self.draft().has_required_fields()
    }

    /// Validates locally, then creates or updates. Success leaves for the list.
    pub async fn submit(&mut self) -> Outcome {
        if !self.state.submit_enabled() {
            return Outcome::Ignored;
        }
        if let Err(err) = self.draft().validate() {
            self.state.set_error(PageError::from(&ClientError::from(err)));
            return Outcome::Stay;
        }

        let mutation = match self.mode {
            FormMode::Create => Mutation::Creating,
            FormMode::Edit(_) => Mutation::Updating,
        };
        if !self.state.begin_mutation(mutation) {
            return Outcome::Ignored;
        }

        let draft = self.draft().clone();
        let result = match &self.mode {
            FormMode::Create => self.service.create(&draft).await,
            FormMode::Edit(id) => self.service.update(id, &draft.to_record()).await,
        };
        match result {
            Ok(_) => {
                self.state.mutation_succeeded();
                Outcome::Navigate(Route::List)
            }
            Err(err) => {
                self.state.mutation_failed(&err);
                Outcome::Stay
            }
        }
    }

    pub fn cancel_route(&self) -> Route {
        Route::List
    }

    pub fn dismiss_error(&mut self) {
        self.state.dismiss_error();
    }
}
