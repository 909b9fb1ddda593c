//! Stateful controllers that keep client-side views in sync with the API.
//!
//! Three families live here:
//!
//! - [`NotificationFeed`]: an optimistically updated notification inbox
//!   with a pending-operation overlay, plus [`NotificationPoller`] for
//!   interval refresh while a session is authenticated.
//! - [`JobList`]: the paged, filterable job board.
//! - [`ApplicationList`]: the paged application inbox with
//!   mutate-then-refetch actions.
//!
//! All controllers are `Send + Sync` behind an `Arc` and guard against
//! out-of-order responses, so callers can fire overlapping operations
//! from UI handlers without sequencing them.

pub mod applications;
pub mod jobs;
pub mod notifications;

pub use applications::{ActionOutcome, ApplicationList};
pub use jobs::JobList;
pub use notifications::{NotificationFeed, NotificationPoller, DEFAULT_POLL_INTERVAL};
