//! Route lookup and entry over a local SQLite database.
//!
//! # Intention
//!
//! - Search routes (all, filtered, by transport, by price ceiling) and print
//!   them as aligned text tables.
//! - Insert routes, creating referenced destinations and transport types on demand.
//!
//! # Architectural Boundaries
//!
//! - Library code never exits the process; every failure is a [`RouteError`].
//! - Terminal I/O stays in [`menu`]; storage stays in [`sqlite`] and [`repository`].

pub mod config;
pub mod date;
pub mod error;
pub mod menu;
pub mod queries;
pub mod repository;
pub mod sqlite;
pub mod table;
pub mod validation;

pub use config::AppConfig;
pub use error::{Result, RouteError};
pub use menu::{InvalidChoicePolicy, Menu};
pub use queries::QueryCatalog;
pub use repository::{NewRoute, RouteQuery, RouteRepository};
pub use table::Table;
