//! Chzzk API plumbing: wire types, the HTTP client, content references and playback extraction

pub mod api;
pub mod cdn;
pub mod playback;
pub mod reference;
pub mod structs;
pub mod utils;

pub use api::{ChzzkClient, ClientConfig};
pub use playback::{LinkType, MediaLink};
pub use reference::{ContentKind, ContentReference};
