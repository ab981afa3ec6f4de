//! PHP emission for tsphp
//!
//! [`PhpPrinter`] walks a parsed TypeScript module and writes PHP. Before it
//! prints any expression it offers the node to each registered [`Feature`];
//! a feature that recognizes the shape writes the replacement through the
//! [`EmitHost`] callbacks and the printer skips its generic rendering.

pub mod features;
pub mod host;
pub mod printer;
pub mod writer;

pub use features::{default_features, Feature};
pub use host::{EmitHint, EmitHost, SourceRef};
pub use printer::PhpPrinter;

use tsphp_diagnostics::Diagnostics;
use tsphp_parser::ParseResult;
use tsphp_types::{ClassIndex, TypeClassifier};

/// Default prefix for generated helper calls: the PHP global namespace.
pub const DEFAULT_HELPER_NAMESPACE: &str = "\\";

/// Knobs for one emission run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// `namespace X;` written after the open tag.
    pub namespace: Option<String>,
    /// Prefix for helper function calls such as `array_merge`.
    pub helper_namespace: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            namespace: None,
            helper_namespace: DEFAULT_HELPER_NAMESPACE.to_string(),
        }
    }
}

/// PHP text plus everything reported while producing it.
#[derive(Debug)]
pub struct TranspileOutput {
    pub php: String,
    pub diagnostics: Diagnostics,
}

/// Transpile a parsed module with the default features and a [`ClassIndex`]
/// built from the module itself.
pub fn transpile(parsed: &ParseResult, source: &str, options: &EmitOptions) -> TranspileOutput {
    let classifier = ClassIndex::from_module(&parsed.module);
    let features = default_features();
    transpile_with(parsed, source, options, &classifier, &features)
}

/// Transpile with an explicit type oracle and feature set.
pub fn transpile_with(
    parsed: &ParseResult,
    source: &str,
    options: &EmitOptions,
    classifier: &dyn TypeClassifier,
    features: &[Box<dyn Feature>],
) -> TranspileOutput {
    let file = SourceRef::new(parsed.file_id, parsed.start_pos);
    let mut printer = PhpPrinter::new(source, file, options, classifier, features);
    printer.print_module(&parsed.module);
    let (php, diagnostics) = printer.finish();
    log::debug!(
        "emitted {} bytes of PHP with {} diagnostics",
        php.len(),
        diagnostics.len()
    );
    TranspileOutput { php, diagnostics }
}
