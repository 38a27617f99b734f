//! # sqler
//!
//! A small helper for building SQL statements from value maps and for
//! mapping result rows onto structs.
//!
//! ## Features
//!
//! - **ValuesMap**: column → value maps rendered in column-name order
//! - **Statements**: `Insert`, `Replace`, `Update`, `Select` with `?` placeholders
//! - **QueryPart**: SQL fragments with their values, composable with `and` / `or`
//! - **Mapper**: `#[derive(Mapper)]` maps struct fields to columns (tag or lower-cased name)
//! - **Bring your own driver**: statements run on anything implementing `Execer` / `Querier`
//!   (tokio-postgres clients and transactions out of the box)
//! - **Logging**: `InstrumentedClient` emits `tracing` events for every statement
//!
//! ## Example
//!
//! ```ignore
//! use sqler::prelude::*;
//!
//! #[derive(Debug, Default, Mapper)]
//! struct User {
//!     id: i64,
//!     #[sqler(column = "user_name")]
//!     name: String,
//! }
//!
//! let user = User { id: 1, name: "alice".into() };
//! Insert::new("users", user.values()).exec(&client).await?;
//!
//! Update::new("users", user.values_of(&[User::COL_NAME]))
//!     .filter(user.equal_values(&[User::COL_ID]))
//!     .exec(&client)
//!     .await?;
//!
//! let users: Vec<User> = Select::new("users")
//!     .fields(User::FIELDS)
//!     .filter(part("id > ?", [0]))
//!     .fetch_all(&client)
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod instrumented;
pub mod mapper;
pub mod part;
pub mod placeholder;
pub mod prelude;
pub mod row;
pub mod stmt;
pub mod value;
pub mod values_map;

pub use client::{Execer, Querier};
pub use config::SqlerConfig;
pub use error::{SqlerError, SqlerResult};
pub use instrumented::InstrumentedClient;
pub use mapper::{Mapper, from_row, scan_row};
pub use part::{QueryPart, equal, part};
pub use placeholder::Placeholder;
pub use row::ResultRow;
pub use stmt::{Insert, Replace, RowQuery, Select, Statement, Update};
pub use value::{FromValue, Value};
pub use values_map::ValuesMap;

#[cfg(feature = "derive")]
pub use sqler_derive::Mapper;
