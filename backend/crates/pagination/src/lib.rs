//! Forward-only cursor pagination primitives for Convex Studio endpoints.
//!
//! Remote table queries hand back an opaque continuation cursor and a
//! "done" flag. There is no backward cursor, so the browsing model offers
//! exactly two moves: continue forward with the stored cursor, or restart
//! from the first page.
//!
//! - [`Pane`] tracks one browsing pane and tags every request it issues with
//!   the selection and generation active at issue time, so late responses for
//!   a superseded request are discarded instead of overwriting newer state.
//! - [`ContinuationToken`] is the opaque token handed to HTTP clients. It binds
//!   a remote cursor to the deployment and table it was issued for.

mod page;
mod pane;
mod token;

pub use page::Page;
pub use pane::{ApplyOutcome, PageRequest, Pane, Selection};
pub use token::{ContinuationToken, TokenError};
