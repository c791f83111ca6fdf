//! Domain types shared between the laptops data-access client and its front-ends.

pub mod coerce;
pub mod domain;
pub mod draft;
pub mod error;
