use crate::utils::error::{FinderError, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Store name to birthday deal, in first-seen order. Re-inserting a store
/// replaces its deal but keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct DealCatalog {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl DealCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FinderError::CatalogNotFound {
                path: path.display().to_string(),
            },
            _ => FinderError::IoError(e),
        })?;

        let catalog = Self::from_reader(file)?;
        tracing::debug!(
            "Loaded {} stores from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Reads CSV with `store` and `deal` headers. Other columns are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| FinderError::CatalogFormat {
                    message: format!("missing '{}' column", name),
                })
        };
        let store_col = column("store")?;
        let deal_col = column("deal")?;

        let mut catalog = Self::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let store = record.get(store_col).map(str::trim).unwrap_or_default();
            let deal = record.get(deal_col).map(str::trim).unwrap_or_default();

            if store.is_empty() {
                tracing::debug!("Skipping catalog row {} with empty store name", row + 2);
                continue;
            }
            catalog.insert(store, deal);
        }

        Ok(catalog)
    }

    pub fn insert(&mut self, store: impl Into<String>, deal: impl Into<String>) {
        let store = store.into();
        let deal = deal.into();
        match self.index.get(&store) {
            Some(&i) => self.entries[i].1 = deal,
            None => {
                self.index.insert(store.clone(), self.entries.len());
                self.entries.push((store, deal));
            }
        }
    }

    pub fn get(&self, store: &str) -> Option<&str> {
        self.index.get(store).map(|&i| self.entries[i].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, d)| (s.as_str(), d.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>, D: Into<String>> FromIterator<(S, D)> for DealCatalog {
    fn from_iter<I: IntoIterator<Item = (S, D)>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for (store, deal) in iter {
            catalog.insert(store, deal);
        }
        catalog
    }
}
