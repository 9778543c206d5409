//! JSON capture files.
//!
//! A capture is what the host runtime dumps when an error is reported: the
//! severity, the call stack with argument snapshots, and optionally the
//! global scope plus whatever the runtime knows about callee signatures.
//!
//! Values are adjacently tagged:
//!
//! ```json
//! {"type": "int", "value": 3}
//! {"type": "array", "value": {"id": 1, "entries": [[0, {"type": "ref", "value": 1}]]}}
//! ```
//!
//! Arrays may carry an `id`; a later `ref` to that id shares the same array,
//! so cyclic and shared structures survive the round trip. A ref to an array
//! that is still being read produces a self-containing array.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;
use trace_fmt::{FunctionSignature, Severity, SignatureRegistry, UnknownSeverity};
use trace_ir::{
    ArrayKey, ArrayValue, CallStack, CallType, CallableValue, RuntimeValue, SourceRange, StackFrame,
};
use trace_stack::ensure_sufficient_stack;

/// Errors from reading a capture.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("cannot read capture file `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid capture: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid capture severity: {0}")]
    Severity(#[from] UnknownSeverity),

    #[error("reference to unknown array #{0}")]
    UnknownRef(u64),

    #[error("array id #{0} is defined twice")]
    DuplicateId(u64),
}

/// A decoded capture.
#[derive(Debug)]
pub struct Capture {
    pub severity: Severity,
    pub stack: CallStack,
    /// Global scope; arguments sharing it are elided when rendered.
    pub globals: Option<Arc<ArrayValue>>,
    /// Signatures, class docs and sources reported by the runtime.
    pub registry: SignatureRegistry,
}

impl Capture {
    pub fn from_json(text: &str) -> Result<Self, CaptureError> {
        let file: CaptureFile = serde_json::from_str(text)?;
        let severity = file.severity.parse::<Severity>()?;

        let mut decoder = Decoder::default();
        let globals = match file.globals {
            Some(ValueDto::Array(array)) => Some(decoder.array(array)?),
            Some(other) => {
                tracing::warn!(found = ?other, "globals is not an array, ignoring");
                None
            }
            None => None,
        };

        let stack = file
            .frames
            .into_iter()
            .map(|frame| decoder.frame(frame))
            .collect::<Result<CallStack, _>>()?;

        let mut registry = SignatureRegistry::new();
        for sig in file.signatures {
            let signature = FunctionSignature {
                params: sig.params,
                required: sig.required,
                doc: sig.doc,
            };
            match sig.class {
                Some(class) => registry.register_method(class, sig.function, signature),
                None => registry.register_function(sig.function, signature),
            }
        }
        for (class, doc) in file.class_docs {
            registry.register_class_doc(class, doc);
        }
        for (file, text) in file.sources {
            registry.register_source(file, &text);
        }

        tracing::debug!(
            frames = stack.len(),
            arrays = decoder.arrays.len(),
            %severity,
            "capture decoded"
        );
        Ok(Capture {
            severity,
            stack,
            globals,
            registry,
        })
    }

    pub fn load(path: &Path) -> Result<Self, CaptureError> {
        let text = std::fs::read_to_string(path).map_err(|source| CaptureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

// -- Wire format --

#[derive(Deserialize)]
struct CaptureFile {
    #[serde(default = "default_severity")]
    severity: String,
    #[serde(default)]
    frames: Vec<FrameDto>,
    #[serde(default)]
    globals: Option<ValueDto>,
    #[serde(default)]
    signatures: Vec<SignatureDto>,
    #[serde(default)]
    class_docs: Vec<(String, String)>,
    #[serde(default)]
    sources: Vec<(String, String)>,
}

fn default_severity() -> String {
    "error".to_string()
}

#[derive(Deserialize)]
struct FrameDto {
    file: Option<String>,
    line: Option<u32>,
    class: Option<String>,
    /// `::`, `->` or `.`
    #[serde(rename = "type")]
    call_type: Option<String>,
    function: Option<String>,
    #[serde(default)]
    args: Vec<ValueDto>,
}

#[derive(Deserialize)]
struct SignatureDto {
    class: Option<String>,
    function: String,
    params: usize,
    required: usize,
    doc: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
enum ValueDto {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Array(ArrayDto),
    Ref(u64),
    Callable(CallableDto),
    Object(String),
    Resource(ResourceDto),
    ClosedResource(u64),
    Other(String),
}

#[derive(Debug, Deserialize)]
struct ArrayDto {
    id: Option<u64>,
    #[serde(default)]
    entries: Vec<(KeyDto, ValueDto)>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KeyDto {
    Index(i64),
    Name(String),
}

#[derive(Debug, Deserialize)]
struct CallableDto {
    name: String,
    file: Option<String>,
    start_line: Option<u32>,
    end_line: Option<u32>,
    this: Option<Box<ValueDto>>,
}

#[derive(Debug, Deserialize)]
struct ResourceDto {
    id: u64,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    metadata: Vec<(String, ValueDto)>,
}

// -- Decoding --

/// Turns wire values into runtime values, resolving array ids.
#[derive(Default)]
struct Decoder {
    arrays: FxHashMap<u64, Arc<ArrayValue>>,
}

impl Decoder {
    fn frame(&mut self, dto: FrameDto) -> Result<StackFrame, CaptureError> {
        let args = dto
            .args
            .into_iter()
            .map(|arg| self.value(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StackFrame {
            file: dto.file,
            line: dto.line,
            class: dto.class,
            call_type: dto
                .call_type
                .as_deref()
                .map(CallType::from_marker)
                .unwrap_or_default(),
            function: dto.function,
            args,
        })
    }

    fn value(&mut self, dto: ValueDto) -> Result<RuntimeValue, CaptureError> {
        Ok(match dto {
            ValueDto::String(s) => RuntimeValue::Str(s),
            ValueDto::Int(n) => RuntimeValue::int(n),
            ValueDto::Float(x) => RuntimeValue::float(x),
            ValueDto::Bool(b) => RuntimeValue::Bool(b),
            ValueDto::Null => RuntimeValue::Null,
            ValueDto::Array(array) => RuntimeValue::Array(self.array(array)?),
            ValueDto::Ref(id) => RuntimeValue::Array(
                self.arrays
                    .get(&id)
                    .cloned()
                    .ok_or(CaptureError::UnknownRef(id))?,
            ),
            ValueDto::Callable(callable) => self.callable(callable)?,
            ValueDto::Object(class) => RuntimeValue::object(class),
            ValueDto::Resource(resource) => {
                let metadata = resource
                    .metadata
                    .into_iter()
                    .map(|(key, value)| Ok((key, self.value(value)?)))
                    .collect::<Result<Vec<_>, CaptureError>>()?;
                RuntimeValue::resource(resource.id, resource.kind, metadata)
            }
            ValueDto::ClosedResource(id) => RuntimeValue::ClosedResource(id),
            ValueDto::Other(type_name) => RuntimeValue::Other(type_name),
        })
    }

    fn array(&mut self, dto: ArrayDto) -> Result<Arc<ArrayValue>, CaptureError> {
        ensure_sufficient_stack(|| {
            let Some(id) = dto.id else {
                let entries = self.entries(dto.entries)?;
                return Ok(ArrayValue::new(entries));
            };
            if self.arrays.contains_key(&id) {
                return Err(CaptureError::DuplicateId(id));
            }

            // Registered before its entries are read so they can refer back to it.
            let array = ArrayValue::deferred();
            self.arrays.insert(id, Arc::clone(&array));
            let entries = self.entries(dto.entries)?;
            array.fill(entries);
            Ok(array)
        })
    }

    fn entries(
        &mut self,
        entries: Vec<(KeyDto, ValueDto)>,
    ) -> Result<Vec<(ArrayKey, RuntimeValue)>, CaptureError> {
        entries
            .into_iter()
            .map(|(key, value)| {
                let key = match key {
                    KeyDto::Index(i) => ArrayKey::Index(i),
                    KeyDto::Name(name) => ArrayKey::Name(name),
                };
                Ok((key, self.value(value)?))
            })
            .collect()
    }

    fn callable(&mut self, dto: CallableDto) -> Result<RuntimeValue, CaptureError> {
        let location = match (dto.file, dto.start_line) {
            (Some(file), Some(start_line)) => Some(SourceRange {
                file,
                start_line,
                end_line: dto.end_line.unwrap_or(start_line),
            }),
            _ => None,
        };
        let bound_this = dto.this.map(|this| self.value(*this)).transpose()?;
        Ok(RuntimeValue::Callable(Box::new(CallableValue {
            name: dto.name,
            location,
            bound_this,
        })))
    }
}

#[cfg(test)]
mod tests;
