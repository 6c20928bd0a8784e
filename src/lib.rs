#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![warn(clippy::style)]
#![allow(clippy::multiple_crate_versions)]

//! Resolves Chzzk live broadcasts, replays and VODs into playable HLS links

pub mod chzzk;
pub mod credentials;
pub mod error;
pub mod resolver;
pub mod util;

pub use chzzk::{ChzzkClient, ClientConfig, ContentKind, ContentReference, LinkType, MediaLink};
pub use credentials::{CredentialProvider, Credentials, EnvSettings, MemorySettings, SettingsStore};
pub use error::{Error, Result};
pub use resolver::{CatalogEntry, DetailRecord, Resolver};
