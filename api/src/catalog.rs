//! Franchise catalog: the display name → CSV path map built once at startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const DATASET_SUFFIX: &str = "_movies.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Franchise {
    /// Display name derived from the file name (`star_wars_movies.csv` → `star wars`).
    pub name: String,
    pub path: PathBuf,
}

impl Franchise {
    /// Dropdown label.
    pub fn label(&self) -> String {
        title_case(&self.name)
    }
}

/// Dropdown entry shipped to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FranchiseOption {
    pub label: String,
    pub value: String,
}

/// Immutable, alphabetically ordered list of discovered franchises.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FranchiseCatalog {
    entries: Vec<Franchise>,
}

impl FranchiseCatalog {
    /// Scan `dir` for `<franchise>_movies.csv` files. A missing or unreadable
    /// directory yields an empty catalog.
    pub fn scan(dir: &Path) -> Self {
        let read_dir = match std::fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(err) => {
                warn!("Couldn't list dataset directory {dir:?}: {err}");
                return Self::default();
            }
        };

        let mut entries = Vec::new();
        for entry in read_dir.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            match display_name(file_name) {
                Some(name) => entries.push(Franchise { name, path }),
                None => debug!("Skipping {file_name}: not a franchise dataset"),
            }
        }

        let catalog = Self::from_entries(entries);
        info!(
            "Discovered {} franchise dataset(s) in {dir:?}",
            catalog.len()
        );
        catalog
    }

    /// Sort by display name. When two files map to the same name the one
    /// with the smaller path wins and the other is logged and dropped.
    pub fn from_entries(mut entries: Vec<Franchise>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
        let mut kept: Vec<Franchise> = Vec::with_capacity(entries.len());
        for entry in entries {
            match kept.last() {
                Some(prev) if prev.name == entry.name => warn!(
                    "Ignoring {:?}: franchise {:?} is already provided by {:?}",
                    entry.path, entry.name, prev.path
                ),
                _ => kept.push(entry),
            }
        }
        Self { entries: kept }
    }

    pub fn get(&self, name: &str) -> Option<&Franchise> {
        self.entries.iter().find(|franchise| franchise.name == name)
    }

    /// Dropdown entries in catalog order; the first is the default selection.
    pub fn options(&self) -> Vec<FranchiseOption> {
        self.iter()
            .map(|franchise| FranchiseOption {
                label: franchise.label(),
                value: franchise.name.clone(),
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Franchise> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `harry_potter_movies.csv` → `harry potter`. `None` for other files.
pub fn display_name(file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(DATASET_SUFFIX)?;
    if stem.is_empty() {
        return None;
    }
    Some(stem.replace('_', " "))
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
