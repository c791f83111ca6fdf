//! Page controllers: each owns one [`state::PageState`] and drives it through
//! the [`client_core::LaptopService`] it was mounted with.

pub mod detail;
pub mod events;
pub mod form;
pub mod list;
pub mod state;

pub use detail::{DetailController, DetailView};
pub use events::{confirmation_prompt, Outcome};
pub use form::{FormController, FormMode, FormView};
pub use list::{ListController, DELETED_NOTICE};
pub use state::{FetchTicket, Mutation, Notice, PageError, PageState, Phase};

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
