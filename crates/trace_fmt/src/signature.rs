//! Best-effort function and class introspection.
//!
//! Introspection is an optional capability: [`NoIntrospection`] answers
//! nothing, [`SignatureRegistry`] answers from tables filled in by the host.
//! Every call into an [`Introspector`] goes through [`guarded`], so a
//! panicking implementation costs one lookup, never the whole trace.

use std::panic::{catch_unwind, AssertUnwindSafe};

use rustc_hash::FxHashMap;
use trace_ir::SourceRange;

/// Statically known shape of a function or method.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Declared parameter count.
    pub params: usize,
    /// Parameters without a default value.
    pub required: usize,
    /// Raw documentation comment.
    pub doc: Option<String>,
}

/// Source of signatures, class docs and closure source text.
///
/// Every method defaults to "unknown".
pub trait Introspector {
    /// Signature of `function`, a method of `owner` when given.
    fn function_signature(
        &self,
        _function: &str,
        _owner: Option<&str>,
    ) -> Option<FunctionSignature> {
        None
    }

    /// Raw documentation comment of `class`.
    fn class_doc(&self, _class: &str) -> Option<String> {
        None
    }

    /// Source lines covered by `range`.
    fn source_excerpt(&self, _range: &SourceRange) -> Option<Vec<String>> {
        None
    }
}

/// Introspector for hosts without reflection.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoIntrospection;

impl Introspector for NoIntrospection {}

/// Table-backed introspector.
#[derive(Clone, Debug, Default)]
pub struct SignatureRegistry {
    functions: FxHashMap<(Option<String>, String), FunctionSignature>,
    classes: FxHashMap<String, String>,
    sources: FxHashMap<String, Vec<String>>,
}

impl SignatureRegistry {
    pub fn new() -> Self {
        SignatureRegistry::default()
    }

    /// Register a free function.
    pub fn register_function(&mut self, name: impl Into<String>, signature: FunctionSignature) {
        self.functions.insert((None, name.into()), signature);
    }

    /// Register a method of `owner`.
    pub fn register_method(
        &mut self,
        owner: impl Into<String>,
        name: impl Into<String>,
        signature: FunctionSignature,
    ) {
        self.functions
            .insert((Some(owner.into()), name.into()), signature);
    }

    /// Register the documentation comment of a class.
    pub fn register_class_doc(&mut self, class: impl Into<String>, doc: impl Into<String>) {
        self.classes.insert(class.into(), doc.into());
    }

    /// Register the full text of a source file, for closure excerpts.
    pub fn register_source(&mut self, file: impl Into<String>, text: &str) {
        self.sources
            .insert(file.into(), text.lines().map(str::to_string).collect());
    }
}

impl Introspector for SignatureRegistry {
    fn function_signature(&self, function: &str, owner: Option<&str>) -> Option<FunctionSignature> {
        self.functions
            .get(&(owner.map(str::to_string), function.to_string()))
            .cloned()
    }

    fn class_doc(&self, class: &str) -> Option<String> {
        self.classes.get(class).cloned()
    }

    fn source_excerpt(&self, range: &SourceRange) -> Option<Vec<String>> {
        let lines = self.sources.get(&range.file)?;
        let start = usize::try_from(range.start_line).ok()?.checked_sub(1)?;
        let end = usize::try_from(range.end_line).ok()?.min(lines.len());
        lines.get(start..end).map(<[String]>::to_vec)
    }
}

/// Resolved signature annotation for one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignatureInfo {
    /// `"<params>.<required>"`, with `" unset <n>"` appended on a deficit.
    /// Empty when nothing could be resolved.
    pub param_summary: String,
    /// Raw documentation comment, empty when unknown.
    pub doc_text: String,
    /// Required parameters missing from the captured arguments.
    ///
    /// A hint that arguments were removed from scope before capture. It does
    /// not say *which* ones, so argument positions are left as captured.
    pub deficit: Option<usize>,
}

impl SignatureInfo {
    pub fn is_empty(&self) -> bool {
        self.param_summary.is_empty() && self.doc_text.is_empty()
    }
}

/// Language constructs that look like calls but have no signature.
const CONSTRUCTS: [&str; 6] = [
    "include",
    "include_once",
    "require",
    "require_once",
    "eval",
    "{main}",
];

/// Resolve the signature annotation for a captured call.
///
/// Anonymous closures, language constructs and unknown names resolve to an
/// empty annotation.
pub fn resolve_signature(
    introspector: &dyn Introspector,
    function: &str,
    owner: Option<&str>,
    captured_args: usize,
) -> SignatureInfo {
    if function.is_empty() || function.contains("{closure}") || CONSTRUCTS.contains(&function) {
        return SignatureInfo::default();
    }
    let owner = owner.filter(|o| !o.is_empty());

    let lookup = || introspector.function_signature(function, owner);
    let Some(signature) = guarded("function_signature", lookup).flatten() else {
        return SignatureInfo::default();
    };

    let deficit = signature
        .required
        .checked_sub(captured_args)
        .filter(|&n| n > 0);

    let param_summary = match deficit {
        Some(n) => format!("{}.{} unset {n}", signature.params, signature.required),
        None => format!("{}.{}", signature.params, signature.required),
    };

    SignatureInfo {
        param_summary,
        doc_text: signature.doc.unwrap_or_default(),
        deficit,
    }
}

/// Run an introspection call, turning a panic into `None`.
pub(crate) fn guarded<T>(what: &'static str, f: impl FnOnce() -> T) -> Option<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(lookup = what, "introspection panicked");
            None
        }
    }
}
