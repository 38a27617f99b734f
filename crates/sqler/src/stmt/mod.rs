//! INSERT / REPLACE / UPDATE / SELECT statements.
//!
//! Every statement renders to SQL with `?` placeholders plus its values in
//! placeholder order. Execution rewrites the placeholders into the style of
//! the executor it runs on.
//!
//! # Usage
//!
//! ```ignore
//! use sqler::{Insert, Select, Statement, RowQuery, Update, equal, part, values};
//!
//! Insert::new("users", values! { "name" => "alice", "age" => 30 })
//!     .exec(&client)
//!     .await?;
//!
//! Update::new("users", values! { "age" => 31 })
//!     .filter(equal(&values! { "name" => "alice" }))
//!     .exec(&client)
//!     .await?;
//!
//! let users: Vec<User> = Select::new("users")
//!     .fields(User::FIELDS)
//!     .filter(part("age > ?", [18]))
//!     .fetch_all(&client)
//!     .await?;
//! ```

mod insert;
mod select;
mod traits;
mod update;

pub use insert::{Insert, Replace};
pub use select::Select;
pub use traits::{RowQuery, Statement};
pub use update::Update;

use crate::error::{SqlerError, SqlerResult};
use crate::part::QueryPart;

/// Check the WHERE part of a statement. A present but empty filter is an error,
/// since it would render as a dangling ` WHERE `.
fn validate_filter(verb: &str, table: &str, filter: Option<&QueryPart>) -> SqlerResult<()> {
    match filter {
        Some(filter) if filter.is_empty() => Err(SqlerError::validation(format!(
            "{verb} on {table} has an empty WHERE clause"
        ))),
        Some(filter) => filter.validate(),
        None => Ok(()),
    }
}
