// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer: the live configuration store and the synchronizer that keeps
//! it current.
//!
//! [`ConfigStore`] is the default [`ConfigurationService`](crate::domain::ConfigurationService)
//! implementation. [`Synchronizer`] drives the initial load and the supervised
//! watch task, restarting lost subscriptions according to a [`RetryPolicy`].

pub mod config_store;
pub mod retry;
pub mod synchronizer;

pub use config_store::ConfigStore;
pub use retry::RetryPolicy;
pub use synchronizer::{
    SyncEvent, SyncExit, SyncHandle, SyncState, Synchronizer, SynchronizerBuilder,
};
