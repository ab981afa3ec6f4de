//! Diagnostic infrastructure for the tsphp transpiler.
//!
//! Rewrite rules never fail with a Rust error when they meet source they cannot
//! translate. They append a [`Diagnostic`] to a [`Diagnostics`] sink and keep
//! going; the driver renders the collection after the pass with one of the
//! [`DiagnosticEmitter`] implementations.
//!
//! # Example
//!
//! ```
//! use tsphp_diagnostics::{
//!     Diagnostic, DiagnosticCode, DiagnosticEmitter, SimpleEmitter, SourceCache, Span,
//! };
//!
//! let mut cache = SourceCache::new();
//! let file_id = cache.add_file("user.ts", "const f = Foo.prototype;".to_string());
//!
//! let diag = Diagnostic::new(DiagnosticCode::PrototypeAccess, "Xxx.prototype is not supported.")
//!     .with_span(Span::new(file_id, 10, 23))
//!     .build();
//!
//! let mut out = Vec::new();
//! SimpleEmitter::new(&mut out).emit(&diag, &cache).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("user.ts:1:11: error"));
//! ```

pub mod diagnostic;
pub mod emitter;
pub mod source_cache;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Diagnostics, Severity};
pub use emitter::{DiagnosticEmitter, JsonEmitter, SimpleEmitter, TerminalEmitter};
pub use source_cache::{SourceCache, SourceFile};
pub use span::{FileId, Location, Span};
