//! Query conditions and the operator builders used to express them.
//!
//! Conditions are usually written as documents, with operators produced by
//! [Command] embedded as field values:
//!
//! ```rust
//! use docbase::doc;
//! use docbase::filter::{Command, Condition};
//!
//! let cmd = Command;
//! let condition: Condition = doc! {
//!     status: "active",
//!     score: (cmd.in_(vec![1, 3])),
//!     expiresAt: (cmd.or(vec![cmd.exists(false), cmd.gt(1_700_000_000)])),
//! }
//! .into();
//! assert!(condition.validate().is_ok());
//! ```
//!
//! # Supported Operators
//!
//! - **Equality**: `eq`, `neq`, plain values
//! - **Comparison**: `gt`, `gte`, `lt`, `lte`
//! - **Membership**: `in`, `nin`
//! - **Existence**: `exists`
//! - **Pattern**: regular expressions via [reg_exp]
//! - **Logical**: `and`, `or`

mod command;
mod condition;

pub use command::*;
pub use condition::*;
