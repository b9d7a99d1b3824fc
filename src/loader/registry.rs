//! Registry of named schemas loaded from disk
//!
//! - Documents live at `<schema_dir>/*.schema.json`, one per file
//! - Names are unique; registering a name twice is an error
//! - References must name a registered document (or one loaded alongside)
//! - References resolve lazily, so documents may refer to themselves

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::compile::{Compiler, Table};
use super::document::SchemaDocument;
use super::errors::LoaderError;
use crate::observability::{log_event_with_fields, metrics, Event, ObservationScope};
use crate::schema::{Schema, SchemaExt};

const DOCUMENT_SUFFIX: &str = ".schema.json";

pub struct SchemaRegistry {
    schema_dir: PathBuf,
    documents: BTreeMap<String, SchemaDocument>,
    table: Arc<Table>,
}

impl SchemaRegistry {
    /// An empty registry reading documents from `schema_dir`.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            documents: BTreeMap::new(),
            table: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every document in the schema directory. A missing directory
    /// holds no documents. Returns the number loaded.
    pub fn load_all(&mut self) -> Result<usize, LoaderError> {
        if !self.schema_dir.exists() {
            return Ok(0);
        }

        let dir = self.schema_dir.display().to_string();
        let scope = ObservationScope::with_fields("SCHEMA_LOAD", &[("dir", dir.as_str())]);

        let outcome = self.read_directory().and_then(|documents| {
            let count = documents.len();
            self.register_all(documents).map(|_| count)
        });

        match &outcome {
            Ok(count) => scope.complete_with_fields(&[("count", count.to_string().as_str())]),
            Err(e) => scope.fail(&e.to_string()),
        }
        outcome
    }

    fn read_directory(&self) -> Result<Vec<SchemaDocument>, LoaderError> {
        let io_error = |source| LoaderError::Io {
            path: self.schema_dir.clone(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.schema_dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            let is_document = path
                .file_name()
                .and_then(|name| name.to_str())
                .map_or(false, |name| name.ends_with(DOCUMENT_SUFFIX));
            if is_document {
                paths.push(path);
            }
        }
        // directory order is platform-dependent
        paths.sort();

        paths.iter().map(|path| read_document(path)).collect()
    }

    /// Registers one document.
    pub fn register(&mut self, document: SchemaDocument) -> Result<(), LoaderError> {
        self.register_all(vec![document])
    }

    /// Parses and registers a document from JSON text.
    pub fn register_json(&mut self, text: &str) -> Result<(), LoaderError> {
        let document: SchemaDocument =
            serde_json::from_str(text).map_err(|source| LoaderError::Json {
                path: PathBuf::from("<in-memory>"),
                source,
            })?;
        self.register(document)
    }

    /// Registers a batch: either every document is added or none is.
    /// References may point anywhere inside the batch.
    fn register_all(&mut self, documents: Vec<SchemaDocument>) -> Result<(), LoaderError> {
        let mut batch: BTreeMap<&str, &SchemaDocument> = BTreeMap::new();
        for document in &documents {
            let name = document.name.as_str();
            if self.documents.contains_key(name) || batch.insert(name, document).is_some() {
                log_event_with_fields(Event::SchemaRejected, &[("name", name)]);
                return Err(LoaderError::Duplicate(name.to_string()));
            }
        }

        for document in &documents {
            for target in document.schema.references() {
                if !self.documents.contains_key(target) && !batch.contains_key(target) {
                    log_event_with_fields(Event::SchemaRejected, &[("name", document.name.as_str())]);
                    return Err(LoaderError::UnknownReference {
                        schema: document.name.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }

        let mut compiled = Vec::with_capacity(documents.len());
        for document in &documents {
            let compiler = Compiler::new(&document.name, Arc::downgrade(&self.table));
            let mut schema = compiler.compile(&document.schema)?;
            if let Some(text) = &document.description {
                schema = schema.describe(text.as_str());
            }
            compiled.push((document.name.clone(), schema));
        }

        {
            let mut table = self
                .table
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            table.extend(compiled);
        }

        let count = documents.len();
        for document in documents {
            self.documents.insert(document.name.clone(), document);
        }

        metrics().add_schemas_loaded(count as u64);
        log_event_with_fields(
            Event::SchemasLoaded,
            &[
                ("count", count.to_string().as_str()),
                ("total", self.len().to_string().as_str()),
            ],
        );
        Ok(())
    }

    /// The compiled schema for `name`. It keeps the registry's table
    /// alive, so its references resolve after the registry is dropped.
    pub fn get(&self, name: &str) -> Option<Schema> {
        self.table
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .map(|schema| schema.anchored(self.table.clone()))
    }

    pub fn document(&self, name: &str) -> Option<&SchemaDocument> {
        self.documents.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.documents.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.documents.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn read_document(path: &Path) -> Result<SchemaDocument, LoaderError> {
    let content = fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LoaderError::Json {
        path: path.to_path_buf(),
        source,
    })
}
