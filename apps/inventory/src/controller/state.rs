//! Finite-state page model shared by every controller.

use std::time::{Duration, Instant};

use client_core::{ClientError, ErrorKind};
use shared::domain::LaptopId;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Creating,
    Updating,
    Deleting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initial,
    Fetching,
    Loaded,
    Failed,
    Mutating(Mutation),
}

/// Error as shown by a page: the failure kind plus its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ClientError> for PageError {
    fn from(err: &ClientError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// `{phase, data, error}` of one page instance.
///
/// Transitions are crate-private; renderers only read.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState<T> {
    phase: Phase,
    data: T,
    error: Option<PageError>,
}

impl<T: Default> Default for PageState<T> {
    fn default() -> Self {
        Self {
            phase: Phase::Initial,
            data: T::default(),
            error: None,
        }
    }
}

impl<T> PageState<T> {
    pub(crate) fn ready(data: T) -> Self {
        Self {
            phase: Phase::Loaded,
            data,
            error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn error(&self) -> Option<&PageError> {
        self.error.as_ref()
    }

    pub fn loading(&self) -> bool {
        matches!(self.phase, Phase::Initial | Phase::Fetching)
    }

    pub fn is_mutating(&self) -> bool {
        matches!(self.phase, Phase::Mutating(_))
    }

    pub fn submit_enabled(&self) -> bool {
        self.phase == Phase::Loaded
    }

    pub(crate) fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub(crate) fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub(crate) fn set_error(&mut self, error: PageError) {
        self.error = Some(error);
    }

    pub(crate) fn reset(&mut self, data: T) {
        self.transition(Phase::Initial);
        self.data = data;
        self.error = None;
    }

    pub(crate) fn begin_fetch(&mut self) {
        self.transition(Phase::Fetching);
        self.error = None;
    }

    pub(crate) fn loaded(&mut self, data: T) {
        self.transition(Phase::Loaded);
        self.data = data;
        self.error = None;
    }

    pub(crate) fn failed(&mut self, err: &ClientError) {
        self.transition(Phase::Failed);
        self.error = Some(err.into());
    }

    pub(crate) fn begin_mutation(&mut self, mutation: Mutation) -> bool {
        if self.phase != Phase::Loaded {
            debug!(phase = ?self.phase, ?mutation, "mutation ignored");
            return false;
        }
        self.transition(Phase::Mutating(mutation));
        self.error = None;
        true
    }

    pub(crate) fn mutation_succeeded(&mut self) {
        self.transition(Phase::Loaded);
    }

    pub(crate) fn mutation_failed(&mut self, err: &ClientError) {
        self.transition(Phase::Loaded);
        self.error = Some(err.into());
    }

    fn transition(&mut self, next: Phase) {
        if self.phase != next {
            debug!(from = ?self.phase, to = ?next, "page transition");
        }
        self.phase = next;
    }
}

/// Identifies one fetch of a single laptop; only the most recently issued
/// ticket of a page may apply its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    id: LaptopId,
}

impl FetchTicket {
    pub fn id(&self) -> &LaptopId {
        &self.id
    }
}

#[derive(Debug, Default)]
pub(crate) struct Tickets {
    latest: u64,
}

impl Tickets {
    pub(crate) fn issue(&mut self, id: LaptopId) -> FetchTicket {
        self.latest += 1;
        FetchTicket {
            seq: self.latest,
            id,
        }
    }

    pub(crate) fn is_current(&self, ticket: &FetchTicket) -> bool {
        if ticket.seq == self.latest {
            return true;
        }
        debug!(
            id = %ticket.id,
            seq = ticket.seq,
            latest = self.latest,
            "discarding stale laptop response"
        );
        false
    }
}

/// Short-lived confirmation message, e.g. after a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    message: String,
    shown_at: Instant,
    ttl: Duration,
}

impl Notice {
    pub(crate) fn new(message: impl Into<String>, ttl: Duration) -> Self {
        Self::shown_at(message, Instant::now(), ttl)
    }

    pub(crate) fn shown_at(message: impl Into<String>, shown_at: Instant, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            shown_at,
            ttl,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < self.ttl
    }
}
