use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use client_core::LaptopService;
use shared::domain::{LaptopId, LaptopRecord};
use tracing::info;

use super::{
    events::{confirmation_prompt, Outcome},
    state::{Mutation, Notice, PageState},
};

pub const DELETED_NOTICE: &str = "Laptop deleted successfully!";

/// The laptops table with its per-row delete action.
pub struct ListController {
    service: Arc<dyn LaptopService>,
    state: PageState<Vec<LaptopRecord>>,
    notice: Option<Notice>,
    notice_ttl: Duration,
}

impl ListController {
    pub fn new(service: Arc<dyn LaptopService>, notice_ttl: Duration) -> Self {
        Self {
            service,
            state: PageState::default(),
            notice: None,
            notice_ttl,
        }
    }

    pub fn state(&self) -> &PageState<Vec<LaptopRecord>> {
        &self.state
    }

    pub fn laptops(&self) -> &[LaptopRecord] {
        self.state.data()
    }

    pub async fn load(&mut self) {
        self.state.begin_fetch();
        match self.service.list_all().await {
            Ok(laptops) => self.state.loaded(laptops),
            Err(err) => {
                self.state.data_mut().clear();
                self.state.failed(&err);
            }
        }
    }

    /// Deletes one row after `confirm` accepts the prompt, then refetches.
    pub async fn delete(&mut self, id: &LaptopId, confirm: impl FnOnce(&str) -> bool) -> Outcome {
        if !self.state.submit_enabled() {
            return Outcome::Ignored;
        }

        let name = self
            .row(id)
            .map(LaptopRecord::confirmation_name)
            .unwrap_or("this laptop");
        if !confirm(&confirmation_prompt(name)) {
            return Outcome::Declined;
        }

        if !self.state.begin_mutation(Mutation::Deleting) {
            return Outcome::Ignored;
        }
        match self.service.remove(id).await {
            Ok(_) => {
                self.state.mutation_succeeded();
                info!(%id, "laptop removed from list");
                self.notice = Some(Notice::new(DELETED_NOTICE, self.notice_ttl));
                self.load().await;
            }
            Err(err) => self.state.mutation_failed(&err),
        }
        Outcome::Stay
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice_at(Instant::now())
    }

    pub fn notice_at(&self, now: Instant) -> Option<&Notice> {
        self.notice
            .as_ref()
            .filter(|notice| notice.is_visible_at(now))
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn dismiss_error(&mut self) {
        self.state.dismiss_error();
    }

    fn row(&self, id: &LaptopId) -> Option<&LaptopRecord> {
        self.state
            .data()
            .iter()
            .find(|laptop| laptop.display_id().as_ref() == Some(id))
    }
}
