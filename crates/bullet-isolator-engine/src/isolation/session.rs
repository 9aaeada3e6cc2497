use std::sync::{Mutex, MutexGuard, PoisonError};

use relative_path::{RelativePath, RelativePathBuf};

use crate::io::{DocumentLines, DocumentStore, IoError};
use crate::isolation::codec::origin_problem;
use crate::isolation::{
    CodecError, LocateError, Provenance, SpliceError, decode, encode, locate, splice_back,
};
use crate::outline::{IndentUnit, ListSyntax};

#[derive(Debug, thiserror::Error)]
pub enum IsolateError {
    #[error(transparent)]
    Locate(#[from] LocateError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Splice(#[from] SpliceError),
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("No side document at {path}; nothing to write back")]
    MissingSideDocument { path: RelativePathBuf },
    #[error("Cannot use {path} as an origin document: it {reason}")]
    InvalidOrigin {
        path: RelativePathBuf,
        reason: &'static str,
    },
    /// The origin already holds the edits; only the cleanup failed
    #[error(
        "Wrote back {origin} but could not remove side document {path}; \
         discard it instead of writing back again: {source}"
    )]
    SideDocumentKept {
        origin: RelativePathBuf,
        path: RelativePathBuf,
        source: IoError,
    },
}

/// Whether a write-back is currently running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteBackState {
    #[default]
    Idle,
    WritingBack,
}

/// Outcome of a write-back request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteBack {
    Written(WriteBackReport),
    /// Another write-back held the latch; this request did nothing
    Dropped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteBackReport {
    pub provenance: Provenance,
    /// Origin document length before the splice
    pub lines_before: usize,
    /// Origin document length after the splice
    pub lines_after: usize,
}

/// Drives isolation sessions against a document store.
///
/// At most one side document exists at a time, at a fixed path. Isolating a
/// new subtree replaces any previous side document and its unsaved edits.
pub struct Isolator<S> {
    store: S,
    syntax: ListSyntax,
    side_document: RelativePathBuf,
    detect_indent: bool,
    state: Mutex<WriteBackState>,
}

impl<S: DocumentStore> Isolator<S> {
    pub fn new(store: S, syntax: ListSyntax, side_document: impl Into<RelativePathBuf>) -> Self {
        Self {
            store,
            syntax,
            side_document: side_document.into(),
            detect_indent: false,
            state: Mutex::new(WriteBackState::Idle),
        }
    }

    /// Measure depth with the indentation each origin document uses
    /// instead of the syntax's fixed unit
    pub fn detect_indent(mut self, detect: bool) -> Self {
        self.detect_indent = detect;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn side_document(&self) -> &RelativePath {
        &self.side_document
    }

    pub fn state(&self) -> WriteBackState {
        *self.lock_state()
    }

    /// Extract the subtree rooted at `line` of `origin` into the side document
    pub fn isolate(&self, origin: &RelativePath, line: usize) -> Result<Provenance, IsolateError> {
        self.check_origin(origin)?;
        let origin_doc = DocumentLines::parse(&self.store.read(origin)?);
        let syntax = self.syntax_for(&origin_doc);

        let subtree = locate(&origin_doc.lines, line, &syntax)?;
        let provenance = subtree.provenance(origin.as_str());

        if self.store.delete(&self.side_document)? {
            log::warn!(
                "Replaced existing side document {}; its unsaved edits are lost",
                self.side_document
            );
        }

        let text = encode(&subtree.body_lines, &provenance);
        self.store.write(&self.side_document, &format!("{text}\n"))?;

        log::info!(
            "Isolated {} lines {}..={} into {}",
            provenance.origin,
            provenance.start_line,
            provenance.end_line,
            self.side_document
        );
        Ok(provenance)
    }

    /// Splice the side document back into its origin and delete it.
    ///
    /// Nothing is written unless every step before the origin write succeeds.
    /// If only the final removal of the side document fails, the error is
    /// [`IsolateError::SideDocumentKept`] and the origin is already updated.
    pub fn write_back(&self) -> Result<WriteBack, IsolateError> {
        let Some(_latch) = self.try_begin_write_back() else {
            log::warn!("Write-back already in progress; dropping this request");
            return Ok(WriteBack::Dropped);
        };

        let side = decode(strip_final_newline(&self.read_side_document()?))?;
        let provenance = side.provenance;
        let origin = RelativePath::new(&provenance.origin);
        self.check_origin(origin)?;

        let origin_doc = DocumentLines::parse(&self.store.read(origin)?);
        let syntax = self.syntax_for(&origin_doc);
        let spliced = splice_back(
            &origin_doc.lines,
            &provenance,
            &side.body_lines,
            syntax.indent,
        )?;

        let lines_before = origin_doc.lines.len();
        let lines_after = spliced.len();

        let replaced = provenance.start_line..=provenance.end_line;
        self.store
            .write(origin, &origin_doc.with_replaced(replaced, spliced).to_text())?;
        if let Err(source) = self.store.delete(&self.side_document) {
            log::error!("Wrote back {origin} but kept side document {}", self.side_document);
            return Err(IsolateError::SideDocumentKept {
                origin: origin.to_relative_path_buf(),
                path: self.side_document.clone(),
                source,
            });
        }

        log::info!("Wrote back {origin} ({lines_before} -> {lines_after} lines)");
        Ok(WriteBack::Written(WriteBackReport {
            provenance,
            lines_before,
            lines_after,
        }))
    }

    /// Delete the side document without writing it back
    pub fn discard(&self) -> Result<bool, IsolateError> {
        let existed = self.store.delete(&self.side_document)?;
        if existed {
            log::info!("Discarded side document {}", self.side_document);
        }
        Ok(existed)
    }

    /// Provenance of the current side document, if there is one
    pub fn pending(&self) -> Result<Option<Provenance>, IsolateError> {
        if !self.store.exists(&self.side_document) {
            return Ok(None);
        }
        let side = decode(strip_final_newline(&self.read_side_document()?))?;
        Ok(Some(side.provenance))
    }

    fn read_side_document(&self) -> Result<String, IsolateError> {
        match self.store.read(&self.side_document) {
            Ok(text) => Ok(text),
            Err(IoError::NotFound(_)) => Err(IsolateError::MissingSideDocument {
                path: self.side_document.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Origins are plain paths below the notes root, never the side document
    fn check_origin(&self, origin: &RelativePath) -> Result<(), IsolateError> {
        let reason = match origin_problem(origin.as_str()) {
            Some(problem) => problem,
            None if origin == self.side_document.as_relative_path() => "is the side document",
            None => return Ok(()),
        };
        Err(IsolateError::InvalidOrigin {
            path: origin.to_relative_path_buf(),
            reason,
        })
    }

    fn syntax_for(&self, doc: &DocumentLines) -> ListSyntax {
        let mut syntax = self.syntax.clone();
        if self.detect_indent {
            syntax.indent = IndentUnit::detect(&doc.lines);
        }
        syntax
    }

    fn try_begin_write_back(&self) -> Option<WriteBackLatch<'_>> {
        let mut state = self.lock_state();
        if *state == WriteBackState::WritingBack {
            return None;
        }
        *state = WriteBackState::WritingBack;
        Some(WriteBackLatch { state: &self.state })
    }

    fn lock_state(&self) -> MutexGuard<'_, WriteBackState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the write-back latch; releases it on drop, including error paths
struct WriteBackLatch<'a> {
    state: &'a Mutex<WriteBackState>,
}

impl Drop for WriteBackLatch<'_> {
    fn drop(&mut self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = WriteBackState::Idle;
    }
}

/// The side document is written with one trailing newline
fn strip_final_newline(text: &str) -> &str {
    match text.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => text,
    }
}
