//! Registry for readers and writers.
//!
//! Built-in adapters are registered on first lookup according to the
//! enabled features; [`register_reader`] and [`register_writer`] add more.
//! Lookups match the canonical language name or any alias, ignoring case.
//! When two entries answer to the same name the first registered wins.

use crate::traits::{Reader, Writer, names_match};
use std::sync::{OnceLock, PoisonError, RwLock};

static READERS: RwLock<Vec<&'static dyn Reader>> = RwLock::new(Vec::new());
static READERS_INITIALIZED: OnceLock<()> = OnceLock::new();

static WRITERS: RwLock<Vec<&'static dyn Writer>> = RwLock::new(Vec::new());
static WRITERS_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom reader.
pub fn register_reader(reader: &'static dyn Reader) {
    init_readers();
    push_reader(reader);
}

/// Register a custom writer.
pub fn register_writer(writer: &'static dyn Writer) {
    init_writers();
    push_writer(writer);
}

fn push_reader(reader: &'static dyn Reader) {
    tracing::debug!(language = reader.language(), "registering reader");
    READERS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .push(reader);
}

fn push_writer(writer: &'static dyn Writer) {
    tracing::debug!(language = writer.language(), "registering writer");
    WRITERS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .push(writer);
}

fn init_readers() {
    READERS_INITIALIZED.get_or_init(|| {
        #[cfg(feature = "read-csharp")]
        {
            push_reader(&crate::input::csharp::CSHARP_READER);
        }
        #[cfg(feature = "read-powershell")]
        {
            push_reader(&crate::input::powershell::POWERSHELL_READER);
        }
    });
}

fn init_writers() {
    WRITERS_INITIALIZED.get_or_init(|| {
        #[cfg(feature = "write-csharp")]
        {
            push_writer(&crate::output::csharp::CSHARP_WRITER);
        }
        #[cfg(feature = "write-powershell")]
        {
            push_writer(&crate::output::powershell::POWERSHELL_WRITER);
        }
    });
}

/// Get a reader by language name or alias.
pub fn reader_for_language(lang: &str) -> Option<&'static dyn Reader> {
    init_readers();
    READERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .find(|r| names_match(r.language(), r.aliases(), lang))
        .copied()
}

/// Get a reader by file extension (with or without the leading dot).
pub fn reader_for_extension(ext: &str) -> Option<&'static dyn Reader> {
    init_readers();
    let ext = ext.trim_start_matches('.');
    READERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .find(|r| r.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .copied()
}

/// Get a writer by language name or alias.
pub fn writer_for_language(lang: &str) -> Option<&'static dyn Writer> {
    init_writers();
    WRITERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .find(|w| names_match(w.language(), w.aliases(), lang))
        .copied()
}

/// Get all registered readers.
pub fn readers() -> Vec<&'static dyn Reader> {
    init_readers();
    READERS.read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Get all registered writers.
pub fn writers() -> Vec<&'static dyn Writer> {
    init_writers();
    WRITERS.read().unwrap_or_else(PoisonError::into_inner).clone()
}
