//! File-kind resolution by file-name suffix.

use std::path::Path;

/// Record-bearing metadata file kinds
///
/// Each variant names the IDL document holding its type and the record type
/// decoded repeatedly from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Table schema file
    TableInfo,
    /// Global dictionary chunks (`.dict`)
    ColumnDictionaryChunk,
    /// Dictionary chunk metadata (`.dictmeta`)
    ColumnDictionaryChunkMeta,
    /// Dictionary sort index (`.sortindex`)
    ColumnSortInfo,
    /// Index file header (`.carbonindex`)
    IndexHeader,
}

impl RecordKind {
    /// Logical name of the IDL document defining the record type
    pub fn schema_name(&self) -> &'static str {
        match self {
            RecordKind::TableInfo => "schema",
            RecordKind::ColumnDictionaryChunk => "dictionary",
            RecordKind::ColumnDictionaryChunkMeta => "dictionary_meta",
            RecordKind::ColumnSortInfo => "sort_index",
            RecordKind::IndexHeader => "carbondataindex",
        }
    }

    /// Unqualified record type name inside that document
    pub fn record_name(&self) -> &'static str {
        match self {
            RecordKind::TableInfo => "TableInfo",
            RecordKind::ColumnDictionaryChunk => "ColumnDictionaryChunk",
            RecordKind::ColumnDictionaryChunkMeta => "ColumnDictionaryChunkMeta",
            RecordKind::ColumnSortInfo => "ColumnSortInfo",
            RecordKind::IndexHeader => "IndexHeader",
        }
    }
}

/// What to do with a file, decided from its name alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Stream of binary records of one type
    Record(RecordKind),
    /// Table status file, already JSON
    JsonPassthrough,
    Unrecognized,
}

impl FileKind {
    /// Classifies a file name (or path string) by suffix.
    ///
    /// First match wins, in this order: `schema`, `tablestatus`, `.dict`,
    /// `.dictmeta`, `.sortindex`, `.carbonindex`.
    pub fn resolve(file_name: &str) -> FileKind {
        if file_name.ends_with("schema") {
            FileKind::Record(RecordKind::TableInfo)
        } else if file_name.ends_with("tablestatus") {
            FileKind::JsonPassthrough
        } else if file_name.ends_with(".dict") {
            FileKind::Record(RecordKind::ColumnDictionaryChunk)
        } else if file_name.ends_with(".dictmeta") {
            FileKind::Record(RecordKind::ColumnDictionaryChunkMeta)
        } else if file_name.ends_with(".sortindex") {
            FileKind::Record(RecordKind::ColumnSortInfo)
        } else if file_name.ends_with(".carbonindex") {
            FileKind::Record(RecordKind::IndexHeader)
        } else {
            FileKind::Unrecognized
        }
    }

    /// Same as `resolve`, on a path's lossy string form.
    pub fn resolve_path(path: &Path) -> FileKind {
        FileKind::resolve(&path.to_string_lossy())
    }
}
