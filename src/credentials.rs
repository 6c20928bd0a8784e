use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, RwLock},
};

use tracing::debug;

use crate::chzzk::utils::non_blank;

pub const NID_AUT_KEY: &str = "CHZZK_NID_AUT";
pub const NID_SES_KEY: &str = "CHZZK_NID_SES";

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const REFERER: &str = "https://chzzk.naver.com/";

/// Header name to value, ordered so the rendered set is stable
pub type Headers = BTreeMap<String, String>;

/// Read-only view over wherever the host keeps user settings
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads settings from the process environment
///
/// Call `dotenvy::dotenv()` beforehand if values should come from a `.env` file
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSettings;

impl SettingsStore for EnvSettings {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory settings, for hosts that manage their own storage
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.into(), value.into());
        }
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }
}

/// `NID_AUT` / `NID_SES` session cookies of a logged in Naver account
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub nid_aut: Option<String>,
    pub nid_ses: Option<String>,
}

impl Credentials {
    /// Both cookies present and non-blank; the only state in which they are sent
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        let aut = non_blank(self.nid_aut.as_deref());
        let ses = non_blank(self.nid_ses.as_deref());
        aut.is_some() && ses.is_some()
    }
}

/// Renders the `Cookie` header for a set of credentials
///
/// Empty unless both cookies are set
#[must_use]
pub fn auth_headers(creds: &Credentials) -> Headers {
    let mut headers = Headers::new();
    let aut = non_blank(creds.nid_aut.as_deref());
    let ses = non_blank(creds.nid_ses.as_deref());
    if let (Some(aut), Some(ses)) = (aut, ses) {
        headers.insert("Cookie".to_string(), format!("NID_AUT={aut}; NID_SES={ses}"));
    }
    headers
}

/// Hands out credentials and request headers, re-reading the store every time
#[derive(Clone)]
pub struct CredentialProvider {
    store: Arc<dyn SettingsStore>,
}

impl CredentialProvider {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn current_credentials(&self) -> Credentials {
        let read = |key: &str| {
            let value = self.store.get(key)?;
            non_blank(Some(value.trim())).map(str::to_string)
        };

        Credentials {
            nid_aut: read(NID_AUT_KEY),
            nid_ses: read(NID_SES_KEY),
        }
    }

    /// Headers attached to every API request and every returned media link
    #[must_use]
    pub fn request_headers(&self) -> Headers {
        let mut headers = Headers::from([
            ("User-Agent".to_string(), USER_AGENT.to_string()),
            ("Referer".to_string(), REFERER.to_string()),
        ]);

        let auth = auth_headers(&self.current_credentials());
        debug!(authenticated = !auth.is_empty(), "Built request headers");
        headers.extend(auth);

        headers
    }
}

impl std::fmt::Debug for CredentialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialProvider").finish_non_exhaustive()
    }
}
