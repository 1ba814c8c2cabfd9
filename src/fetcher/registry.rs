//! Duplicate-name resolution
//!
//! Different URLs can share a last path segment (the same slug published on two
//! dates). The first URL to claim a short name keeps it; every later URL with the
//! same short name gets a name derived from its full path instead. A derived name
//! that is itself taken is qualified with the host, then numbered, so no two
//! distinct URLs ever share an artifact.

use crate::error::Result;
use crate::utils::{
    ARTIFACT_EXTENSION, host_qualified_name, not_found_name, path_derived_name, short_name,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The artifact name assigned to a URL
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameClaim {
    /// File name inside the save directory
    pub file_name: String,
    /// True when the URL owns the plain short name
    pub primary: bool,
}

#[derive(Debug, Default)]
struct Names {
    /// Short name → URLs with that short name, in claim order
    by_short: HashMap<String, Vec<String>>,
    /// URL → assigned name
    claims: HashMap<String, NameClaim>,
    /// Every assigned file name and its not-found marker
    taken: HashSet<String>,
}

impl Names {
    fn is_free(&self, file_name: &str) -> bool {
        !self.taken.contains(file_name) && !self.taken.contains(&not_found_name(file_name))
    }

    fn reserve(&mut self, file_name: &str) {
        self.taken.insert(file_name.to_string());
        self.taken.insert(not_found_name(file_name));
    }

    /// First free name among: path-derived, host-qualified, host-qualified and numbered
    fn fallback_name(&self, url: &str) -> Result<String> {
        let derived = path_derived_name(url)?;
        if self.is_free(&derived) {
            return Ok(derived);
        }
        let qualified = host_qualified_name(url)?;
        if self.is_free(&qualified) {
            return Ok(qualified);
        }
        let stem = qualified
            .strip_suffix(&format!(".{ARTIFACT_EXTENSION}"))
            .unwrap_or(&qualified);
        let mut n = 2u32;
        loop {
            let candidate = format!("{stem}-{n}.{ARTIFACT_EXTENSION}");
            if self.is_free(&candidate) {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

/// Names handed out during a run. Safe to share between workers.
#[derive(Debug, Default)]
pub struct DuplicateRegistry {
    names: Mutex<Names>,
}

impl DuplicateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign an artifact name to a normalized URL
    ///
    /// The check and the update happen under one lock, so two workers racing on
    /// the same short name always produce exactly one primary claim, and no two
    /// distinct URLs get the same file name. A URL that was already claimed gets
    /// the same name again.
    pub fn claim(&self, url: &str) -> Result<NameClaim> {
        let short = short_name(url)?;

        let mut names = self.lock();
        if let Some(existing) = names.claims.get(url) {
            return Ok(existing.clone());
        }

        let claim = if names.is_free(&short) {
            NameClaim {
                file_name: short.clone(),
                primary: true,
            }
        } else {
            let file_name = names.fallback_name(url)?;
            tracing::debug!(
                url,
                short_name = %short,
                file_name = %file_name,
                "short name already taken, using fallback name"
            );
            NameClaim {
                file_name,
                primary: false,
            }
        };

        names.reserve(&claim.file_name);
        names.by_short.entry(short).or_default().push(url.to_string());
        names.claims.insert(url.to_string(), claim.clone());
        Ok(claim)
    }

    /// URLs registered under a short name, in claim order
    pub fn urls_for(&self, short_name: &str) -> Vec<String> {
        self.lock()
            .by_short
            .get(short_name)
            .cloned()
            .unwrap_or_default()
    }

    /// Short names claimed by more than one URL
    pub fn collisions(&self) -> HashMap<String, Vec<String>> {
        self.lock()
            .by_short
            .iter()
            .filter(|(_, urls)| urls.len() > 1)
            .map(|(name, urls)| (name.clone(), urls.clone()))
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Names> {
        // The maps are always left consistent, so a panic elsewhere does not poison them
        self.names.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// URLs in an input list that share a short name
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// The contested short name (e.g. `the-morning-after.html`)
    pub short_name: String,
    /// Every distinct URL mapping to it, in list order
    pub urls: Vec<String>,
}

/// Group a URL list by short name, keeping only contested names
///
/// Groups are ordered by first appearance of their short name. Repeated identical
/// URLs are counted once. URLs that cannot be named are ignored.
pub fn duplicate_report<I, S>(urls: I) -> Vec<DuplicateGroup>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<String>> = HashMap::new();

    for raw in urls {
        let url = crate::utils::normalize_url(raw.as_ref());
        let Ok(short) = short_name(url) else {
            continue;
        };
        let group = groups.entry(short.clone()).or_insert_with(|| {
            order.push(short.clone());
            Vec::new()
        });
        if !group.iter().any(|u| u == url) {
            group.push(url.to_string());
        }
    }

    order
        .into_iter()
        .filter_map(|short| {
            let urls = groups.remove(&short)?;
            (urls.len() > 1).then_some(DuplicateGroup {
                short_name: short,
                urls,
            })
        })
        .collect()
}
