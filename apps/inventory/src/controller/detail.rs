use std::sync::Arc;

use client_core::{ErrorKind, LaptopService, Result};
use shared::domain::{LaptopId, LaptopRecord};

use super::{
    events::{confirmation_prompt, Outcome},
    state::{FetchTicket, Mutation, PageError, PageState, Tickets},
};
use crate::router::Route;

#[derive(Debug, PartialEq)]
pub enum DetailView<'a> {
    Loading,
    NotFound,
    Error(&'a PageError),
    Ready(&'a LaptopRecord),
}

/// Read-only card for one laptop, with edit and delete actions.
pub struct DetailController {
    service: Arc<dyn LaptopService>,
    state: PageState<Option<LaptopRecord>>,
    tickets: Tickets,
    target: Option<LaptopId>,
}

impl DetailController {
    pub fn new(service: Arc<dyn LaptopService>) -> Self {
        Self {
            service,
            state: PageState::default(),
            tickets: Tickets::default(),
            target: None,
        }
    }

    pub fn service(&self) -> Arc<dyn LaptopService> {
        Arc::clone(&self.service)
    }

    pub fn state(&self) -> &PageState<Option<LaptopRecord>> {
        &self.state
    }

    pub fn target(&self) -> Option<&LaptopId> {
        self.target.as_ref()
    }

    pub fn begin_load(&mut self, id: LaptopId) -> FetchTicket {
        if self.target.as_ref() != Some(&id) {
            self.state.reset(None);
            self.target = Some(id.clone());
        }
        self.state.begin_fetch();
        self.tickets.issue(id)
    }

    pub fn complete_load(&mut self, ticket: FetchTicket, result: Result<LaptopRecord>) -> bool {
        if !self.tickets.is_current(&ticket) {
            return false;
        }
        match result {
            Ok(laptop) => self.state.loaded(Some(laptop)),
            Err(err) => {
                *self.state.data_mut() = None;
                self.state.failed(&err);
            }
        }
        true
    }

    pub async fn load(&mut self, id: LaptopId) {
        let ticket = self.begin_load(id);
        let result = self.service.get_by_id(ticket.id()).await;
        self.complete_load(ticket, result);
    }

    pub fn view(&self) -> DetailView<'_> {
        if self.state.loading() {
            return DetailView::Loading;
        }
        if let Some(laptop) = self.state.data() {
            return DetailView::Ready(laptop);
        }
        match self.state.error() {
            Some(err) if err.kind != ErrorKind::NotFound => DetailView::Error(err),
            _ => DetailView::NotFound,
        }
    }

    pub fn edit_route(&self) -> Option<Route> {
        self.target.clone().map(Route::Edit)
    }

    pub async fn delete(&mut self, confirm: impl FnOnce(&str) -> bool) -> Outcome {
        if !self.state.submit_enabled() {
            return Outcome::Ignored;
        }
        let (Some(id), Some(laptop)) = (self.target.clone(), self.state.data().as_ref()) else {
            return Outcome::Ignored;
        };

        if !confirm(&confirmation_prompt(laptop.confirmation_name())) {
            return Outcome::Declined;
        }
        if !self.state.begin_mutation(Mutation::Deleting) {
            return Outcome::Ignored;
        }
        match self.service.remove(&id).await {
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

    pub fn dismiss_error(&mut self) {
        self.state.dismiss_error();
    }
}
