//! Schema catalog: logical schema name -> resolved `SchemaDefinition`
//!
//! IDL documents live at `<thrift_dir>/<logical_name>.thrift`. Each
//! document is loaded on first use and cached for the catalog's lifetime.
//! Includes are loaded through the same cache.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event};

use super::errors::{SchemaError, SchemaResult};
use super::parser::parse_document;
use super::resolver::build_definition;
use super::types::SchemaDefinition;

/// File extension of IDL documents
pub const IDL_EXTENSION: &str = "thrift";

/// Loads and caches schema definitions by logical name.
pub struct SchemaCatalog {
    /// Directory containing IDL documents
    thrift_dir: PathBuf,
    /// IDL text registered in memory, consulted before the file system
    sources: HashMap<String, String>,
    /// Resolved definitions indexed by logical name
    cache: HashMap<String, Arc<SchemaDefinition>>,
}

impl SchemaCatalog {
    /// Creates a catalog reading IDL documents from `thrift_dir`.
    pub fn new(thrift_dir: impl Into<PathBuf>) -> Self {
        Self {
            thrift_dir: thrift_dir.into(),
            sources: HashMap::new(),
            cache: HashMap::new(),
        }
    }

    /// Creates a catalog for a data store checkout.
    ///
    /// IDL documents are expected at `<root>/format/src/main/thrift/`.
    pub fn for_root(root: &Path) -> Self {
        Self::new(root.join("format").join("src").join("main").join("thrift"))
    }

    /// Returns the IDL directory.
    pub fn thrift_dir(&self) -> &Path {
        &self.thrift_dir
    }

    /// Path the IDL document for `logical_name` is read from.
    pub fn idl_path(&self, logical_name: &str) -> PathBuf {
        self.thrift_dir
            .join(format!("{}.{}", logical_name, IDL_EXTENSION))
    }

    /// Registers IDL text under a logical name.
    ///
    /// Registered text wins over the file system. Registering after the
    /// name was resolved has no effect on the cached definition.
    pub fn register_source(&mut self, logical_name: impl Into<String>, idl: impl Into<String>) {
        self.sources.insert(logical_name.into(), idl.into());
    }

    /// Returns whether `logical_name` has been loaded.
    pub fn is_cached(&self, logical_name: &str) -> bool {
        self.cache.contains_key(logical_name)
    }

    /// Resolves a logical schema name, loading it on first use.
    ///
    /// # Errors
    ///
    /// `CARBON_SCHEMA_NOT_FOUND` when the document cannot be read,
    /// `CARBON_SCHEMA_MALFORMED` when it (or an include) fails to parse or
    /// resolve.
    pub fn resolve(&mut self, logical_name: &str) -> SchemaResult<Arc<SchemaDefinition>> {
        let mut loading = Vec::new();
        self.resolve_inner(logical_name, &mut loading).map_err(|e| {
            log_event_with_fields(
                Event::SchemaLoadFailed,
                &[("schema", logical_name), ("code", e.code().code())],
            );
            e
        })
    }

    fn resolve_inner(
        &mut self,
        logical_name: &str,
        loading: &mut Vec<String>,
    ) -> SchemaResult<Arc<SchemaDefinition>> {
        if let Some(definition) = self.cache.get(logical_name) {
            log_event_with_fields(Event::SchemaCacheHit, &[("schema", logical_name)]);
            return Ok(Arc::clone(definition));
        }

        if loading.iter().any(|name| name == logical_name) {
            return Err(SchemaError::malformed(
                logical_name,
                format!("include cycle: {} -> {}", loading.join(" -> "), logical_name),
            ));
        }

        let (text, source) = self.read_source(logical_name)?;
        let document = parse_document(logical_name, &text)?;

        loading.push(logical_name.to_string());
        let mut includes = Vec::with_capacity(document.includes.len());
        for include in &document.includes {
            let resolved = include_logical_name(logical_name, include)
                .and_then(|included_name| self.resolve_inner(&included_name, loading));
            match resolved {
                Ok(definition) => includes.push(definition),
                Err(e) => {
                    loading.pop();
                    return Err(e);
                }
            }
        }
        loading.pop();

        let definition = Arc::new(build_definition(logical_name, source, document, &includes)?);

        let record_count = definition.record_type_count().to_string();
        log_event_with_fields(
            Event::SchemaLoaded,
            &[("schema", logical_name), ("record_types", &record_count)],
        );

        self.cache
            .insert(logical_name.to_string(), Arc::clone(&definition));
        Ok(definition)
    }

    fn read_source(&self, logical_name: &str) -> SchemaResult<(String, Option<PathBuf>)> {
        if let Some(text) = self.sources.get(logical_name) {
            return Ok((text.clone(), None));
        }

        let path = self.idl_path(logical_name);
        let text = fs::read_to_string(&path).map_err(|e| {
            SchemaError::not_found(logical_name, path.display().to_string(), e)
        })?;
        Ok((text, Some(path)))
    }
}

/// `"schema.thrift"` -> `"schema"`
///
/// Includes resolve relative to the including document, and every catalog
/// document sits directly in the IDL directory, so only sibling files are
/// reachable. A path with a directory part is rejected rather than flattened.
fn include_logical_name(including: &str, include: &str) -> SchemaResult<String> {
    if include.contains(['/', '\\']) {
        return Err(SchemaError::malformed(
            including,
            format!("include \"{}\" is not a file in the IDL directory", include),
        ));
    }
    let name = include.strip_suffix(".thrift").unwrap_or(include);
    if name.is_empty() {
        return Err(SchemaError::malformed(including, "empty include path"));
    }
    Ok(name.to_string())
}
