use std::path::Path;

/// One selectable page: a label for the picker and the reference to load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub display_name: String,
    pub image_url: String,
}

/// Supplier of selectable images. Only `image_url` is ever loaded.
pub trait ImageCatalog {
    fn list_selectable_images(&self) -> Vec<CatalogEntry>;
}

/// A fixed list of entries.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }
}

impl ImageCatalog for StaticCatalog {
    fn list_selectable_images(&self) -> Vec<CatalogEntry> {
        self.entries.clone()
    }
}

/// Entries resolved from literal paths, glob patterns and URLs, re-read on
/// every listing so new files show up.
#[derive(Clone, Debug, Default)]
pub struct GlobCatalog {
    patterns: Vec<String>,
}

impl GlobCatalog {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }
}

impl ImageCatalog for GlobCatalog {
    fn list_selectable_images(&self) -> Vec<CatalogEntry> {
        let mut entries: Vec<CatalogEntry> = Vec::new();
        let mut push = |entry: CatalogEntry| {
            if !entries.iter().any(|e| e.image_url == entry.image_url) {
                entries.push(entry);
            }
        };

        for pattern in &self.patterns {
            if is_remote(pattern) {
                push(CatalogEntry {
                    display_name: display_name_for(pattern),
                    image_url: pattern.clone(),
                });
                continue;
            }

            let as_path = Path::new(pattern);
            if as_path.is_file() {
                push(entry_for_path(as_path));
                continue;
            }

            match glob::glob(pattern) {
                Ok(paths) => {
                    let mut matched = false;
                    for path in paths.flatten().filter(|p| p.is_file()) {
                        push(entry_for_path(&path));
                        matched = true;
                    }
                    if !matched {
                        log::warn!("Catalog pattern '{pattern}' matched no files");
                    }
                }
                Err(e) => log::warn!("Invalid catalog pattern '{pattern}': {e}"),
            }
        }
        entries
    }
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

fn entry_for_path(path: &Path) -> CatalogEntry {
    CatalogEntry {
        display_name: display_name_for(&path.to_string_lossy()),
        image_url: path.to_string_lossy().into_owned(),
    }
}

/// "floral_garden-02.png" becomes "Floral Garden 02".
pub fn display_name_for(reference: &str) -> String {
    let file = reference
        .trim_end_matches('/')
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(reference);
    let stem = match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    };
    stem.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
