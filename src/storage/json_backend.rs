use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    domain::{
        catalog::CatalogItem,
        ids::{IdProvider, UuidIds},
        lookup::{ReferenceData, ReferenceTables},
        transaction::FinanceTransaction,
    },
    errors::DojoError,
    wizard::{
        CatalogClient, ClientError, Created, CreatedRef, ItemRecord, MembershipRecord, RecordKind,
        RecordPayload,
    },
};

use super::Result;

/// A record as persisted: the stored id next to the committed payload.
pub type Stored<R> = Created<R>;

/// Local stand-in for the backend: each list lives in its own JSON file under
/// the application directory and every write replaces the file atomically.
#[derive(Clone)]
pub struct JsonStore {
    root: PathBuf,
    catalog_file: PathBuf,
    classes_file: PathBuf,
    memberships_file: PathBuf,
    transactions_file: PathBuf,
    reference_file: PathBuf,
    ids: Arc<dyn IdProvider>,
}

impl JsonStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(PathResolver::base_dir);
        ensure_dir(&root)?;
        Ok(Self {
            catalog_file: PathResolver::catalog_file_in(&root),
            classes_file: PathResolver::classes_file_in(&root),
            memberships_file: PathResolver::memberships_file_in(&root),
            transactions_file: PathResolver::transactions_file_in(&root),
            reference_file: PathResolver::reference_file_in(&root),
            root,
            ids: Arc::new(UuidIds),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    /// Replaces the id provider used for newly created records.
    pub fn with_ids(mut self, ids: Arc<dyn IdProvider>) -> Self {
        self.ids = ids;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn load_transactions(&self) -> Result<Vec<FinanceTransaction>> {
        read_list(&self.transactions_file)
    }

    pub fn save_transactions(&self, transactions: &[FinanceTransaction]) -> Result<()> {
        write_list(&self.transactions_file, transactions)
    }

    pub fn load_catalog(&self) -> Result<Vec<CatalogItem>> {
        read_list(&self.catalog_file)
    }

    pub fn save_catalog(&self, items: &[CatalogItem]) -> Result<()> {
        write_list(&self.catalog_file, items)
    }

    pub fn load_items(&self) -> Result<Vec<Stored<ItemRecord>>> {
        read_list(&self.classes_file)
    }

    pub fn load_memberships(&self) -> Result<Vec<Stored<MembershipRecord>>> {
        read_list(&self.memberships_file)
    }

    /// Reference tables from `reference.json`, or the demo tables when the
    /// file does not exist.
    pub fn load_reference(&self) -> Result<ReferenceData> {
        if !self.reference_file.exists() {
            debug!(path = %self.reference_file.display(), "no reference file, using demo tables");
            return Ok(ReferenceData::demo());
        }
        let data = fs::read_to_string(&self.reference_file)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save_reference(&self, reference: &ReferenceData) -> Result<()> {
        let json = serde_json::to_string_pretty(reference)?;
        write_atomic(&self.reference_file, &json)
    }

    /// Reference tables with stored classes added to the class lookup, so
    /// memberships can grant access to classes created through the wizard.
    pub fn reference_tables(&self) -> Result<ReferenceTables> {
        let mut data = self.load_reference()?;
        for stored in self.load_items()? {
            if let ItemRecord::Class(class) = &stored.record {
                data.classes.insert(stored.id.clone(), class.details.name.clone());
            }
        }
        Ok(data.into())
    }

    fn create_in<T, F>(&self, path: &Path, prefix: &str, build: F) -> Result<String>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&str) -> T,
    {
        let mut entries: Vec<T> = read_list(path)?;
        let id = self.ids.next_id(prefix);
        entries.push(build(&id));
        write_list(path, &entries)?;
        info!(%id, path = %path.display(), "record created");
        Ok(id)
    }
}

impl CatalogClient for JsonStore {
    fn create(&mut self, payload: &RecordPayload) -> std::result::Result<CreatedRef, ClientError> {
        let id = match payload {
            RecordPayload::Item(record) => {
                self.create_in(&self.classes_file, "item", |id| Created {
                    id: id.to_string(),
                    record: record.clone(),
                })?
            }
            RecordPayload::Membership(record) => {
                self.create_in(&self.memberships_file, "membership", |id| Created {
                    id: id.to_string(),
                    record: record.clone(),
                })?
            }
            RecordPayload::Product(product) => {
                self.create_in(&self.catalog_file, "product", |id| CatalogItem {
                    id: id.to_string(),
                    ..product.clone()
                })?
            }
        };
        Ok(CreatedRef { id })
    }

    fn update(&mut self, id: &str, payload: &RecordPayload) -> std::result::Result<(), ClientError> {
        let kind = payload.kind();
        let replaced = match payload {
            RecordPayload::Item(record) => replace_in(
                &self.classes_file,
                |entry: &Stored<ItemRecord>| entry.id == id,
                |entry: &mut Stored<ItemRecord>| entry.record = record.clone(),
            )?,
            RecordPayload::Membership(record) => replace_in(
                &self.memberships_file,
                |entry: &Stored<MembershipRecord>| entry.id == id,
                |entry: &mut Stored<MembershipRecord>| entry.record = record.clone(),
            )?,
            RecordPayload::Product(product) => replace_in(
                &self.catalog_file,
                |entry: &CatalogItem| entry.id == id,
                |entry: &mut CatalogItem| {
                    *entry = CatalogItem {
                        id: id.to_string(),
                        ..product.clone()
                    }
                },
            )?,
        };
        if replaced {
            info!(%id, %kind, "record updated");
            Ok(())
        } else {
            Err(ClientError::NotFound {
                kind,
                id: id.to_string(),
            })
        }
    }

    fn remove(&mut self, kind: RecordKind, id: &str) -> std::result::Result<(), ClientError> {
        let removed = match kind {
            RecordKind::Item => {
                remove_from::<Stored<ItemRecord>, _>(&self.classes_file, |entry| entry.id == id)?
            }
            RecordKind::Membership => remove_from::<Stored<MembershipRecord>, _>(
                &self.memberships_file,
                |entry| entry.id == id,
            )?,
            RecordKind::Product => {
                remove_from::<CatalogItem, _>(&self.catalog_file, |entry| entry.id == id)?
            }
        };
        if removed {
            info!(%id, %kind, "record removed");
            Ok(())
        } else {
            Err(ClientError::NotFound {
                kind,
                id: id.to_string(),
            })
        }
    }
}

/// Missing files read as empty lists.
fn read_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&data).map_err(|err| {
        DojoError::Storage(format!("failed to parse `{}`: {err}", path.display()))
    })
}

fn write_list<T: Serialize>(path: &Path, entries: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(entries)?;
    write_atomic(path, &json)
}

fn replace_in<T, M, R>(path: &Path, matches: M, replace: R) -> Result<bool>
where
    T: Serialize + DeserializeOwned,
    M: Fn(&T) -> bool,
    R: FnOnce(&mut T),
{
    let mut entries: Vec<T> = read_list(path)?;
    match entries.iter_mut().find(|entry| matches(entry)) {
        Some(entry) => {
            replace(entry);
            write_list(path, &entries)?;
            Ok(true)
        }
        None => {
            debug!(path = %path.display(), "no record to update");
            Ok(false)
        }
    }
}

fn remove_from<T, F>(path: &Path, matches: F) -> Result<bool>
where
    T: Serialize + DeserializeOwned,
    F: Fn(&T) -> bool,
{
    let mut entries: Vec<T> = read_list(path)?;
    let before = entries.len();
    entries.retain(|entry| !matches(entry));
    if entries.len() == before {
        return Ok(false);
    }
    write_list(path, &entries)?;
    Ok(true)
}
