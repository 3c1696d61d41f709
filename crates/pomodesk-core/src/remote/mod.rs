//! Remote session store.
//!
//! The hosted backend is treated as an opaque CRUD table keyed by user
//! identity: insert a session row, query rows by user and time range.
//! Writes are fire-and-forget from the timer's perspective; callers log
//! failures and keep local state.

mod client;

pub use client::RemoteStore;
