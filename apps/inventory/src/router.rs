//! Route table of the inventory front-end.

use std::fmt;

use shared::domain::LaptopId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Create,
    Edit(LaptopId),
    Detail(LaptopId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no page is mounted at '{0}'")]
    Unknown(String),
}

impl Route {
    /// Resolves a path such as `/laptops/edit/7`. Trailing slashes are
    /// ignored; an empty id segment is not a route.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let unknown = || RouteError::Unknown(path.to_string());
        let segments: Vec<&str> = path
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [] | ["laptops"] => Ok(Self::List),
            ["laptops", "new"] => Ok(Self::Create),
            ["laptops", "edit", id] => Ok(Self::Edit(LaptopId::from(*id))),
            ["laptops", id] if *id != "edit" => Ok(Self::Detail(LaptopId::from(*id))),
            _ => Err(unknown()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::List => "/laptops".to_string(),
            Self::Create => "/laptops/new".to_string(),
            Self::Edit(id) => format!("/laptops/edit/{id}"),
            Self::Detail(id) => format!("/laptops/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
