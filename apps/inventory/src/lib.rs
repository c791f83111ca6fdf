//! Laptop inventory front-end: routes, page controllers and their terminal
//! rendering on top of [`client_core::LaptopService`].

pub mod config;
pub mod controller;
pub mod render;
pub mod router;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
