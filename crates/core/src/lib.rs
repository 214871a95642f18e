//! Lodgekit Core Library
//!
//! Domain models, moderated-edit workflow, and storage for the Lodgekit
//! hotel platform.

pub mod approval;
pub mod assign;
pub mod config;
pub mod error;
pub mod invariants;
pub mod models;
pub mod notify;
pub mod related;
pub mod slug;
pub mod storage;
pub mod writer;

pub use approval::{DraftEngine, DraftInput};
pub use assign::assign_chain;
pub use config::CoreConfig;
pub use error::{Error, Result};
pub use models::*;
pub use notify::{ChannelSink, LogSink, Notification, NotificationSink};
pub use related::recompute_related;
pub use storage::{
    ChainRepository, ChainStore, Database, DraftRepository, DraftStore, HotelRepository,
    HotelStore, PrincipalRepository, PrincipalStore, Storage,
};
pub use writer::{ChainInput, ChainRef, HotelInput, HotelWriter};
