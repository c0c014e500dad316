//! # huddle-store
//!
//! Document store interface and change streams for Huddle.
//!
//! The persistent store itself is an external collaborator; this crate
//! defines the seam the rest of the workspace talks to:
//! - `EntityStore`: subscribe / get / add / update / conditional update / delete
//! - `Subscription`: one live (collection, filter) feed of raw change batches
//! - `ChangeStreamWatcher`: normalizes raw batches into typed `ChangeEvent`s
//! - `MemoryStore`: an in-process store for tests and local runs

pub mod error;
pub mod event;
pub mod filter;
pub mod memory;
pub mod store;
pub mod watcher;

pub use error::StoreError;
pub use event::{ChangeEvent, RawChange};
pub use filter::Filter;
pub use memory::MemoryStore;
pub use store::{CloseHandle, EntityStore, Subscription};
pub use watcher::ChangeStreamWatcher;
