//! Secure registry of authorized network identifiers.
//!
//! The set is loaded once per cold start and never mutated afterwards.
//! Every lookup still runs under the registry lock, so no reader can observe
//! a partially written set.

use core::fmt;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

use crate::config::{MAX_SSID_LEN, REGISTRY_CAPACITY};
use crate::protocol::SsidString;

/// Validated, fixed-capacity list of authorized identifiers.
pub type Allowlist = Vec<SsidString, REGISTRY_CAPACITY>;

/// Why an authorized set could not be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// More names than `REGISTRY_CAPACITY`
    TooManyEntries(usize),
    /// A name is empty
    EmptyEntry,
    /// A name exceeds `MAX_SSID_LEN` bytes
    EntryTooLong(usize),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::TooManyEntries(n) => {
                write!(f, "{n} entries, at most {REGISTRY_CAPACITY} supported")
            }
            RegistryError::EmptyEntry => f.write_str("empty network name"),
            RegistryError::EntryTooLong(len) => {
                write!(f, "network name is {len} bytes, limit is {MAX_SSID_LEN}")
            }
        }
    }
}

/// Build an [`Allowlist`] from plain names, rejecting anything that would not fit.
pub fn allowlist(names: &[&str]) -> Result<Allowlist, RegistryError> {
    if names.len() > REGISTRY_CAPACITY {
        return Err(RegistryError::TooManyEntries(names.len()));
    }
    let mut list = Allowlist::new();
    for &name in names {
        if name.is_empty() {
            return Err(RegistryError::EmptyEntry);
        }
        let entry =
            SsidString::try_from(name).map_err(|_| RegistryError::EntryTooLong(name.len()))?;
        list.push(entry)
            .map_err(|_| RegistryError::TooManyEntries(names.len()))?;
    }
    Ok(list)
}

pub struct SecureRegistry {
    entries: Mutex<CriticalSectionRawMutex, Allowlist>,
}

impl SecureRegistry {
    pub const fn new(entries: Allowlist) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Exact, case-sensitive membership test.
    ///
    /// The lock is held for the whole scan and released when the closure
    /// returns, including on the early exit of a match.
    pub fn is_authorized(&self, ssid: &str) -> bool {
        self.entries
            .lock(|entries| entries.iter().any(|entry| entry.as_str() == ssid))
    }

    pub fn len(&self) -> usize {
        self.entries.lock(|entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
