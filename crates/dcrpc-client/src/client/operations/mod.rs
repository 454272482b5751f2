//! Call-site operations
//!
//! Each remote call comes in two forms: `<op>_async`, which dispatches and
//! returns a [`ResponseFuture`](crate::ResponseFuture) at once, and `<op>`,
//! which dispatches and waits under the same call context.
//!
//! - `mining`: generation, hash rate, work and block submission

pub mod mining;
