//! Stack frames and captured call stacks.

use std::fmt;

use crate::value::RuntimeValue;

/// How a method was invoked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CallType {
    /// Plain function call.
    #[default]
    None,
    /// Static method call (`::`).
    Static,
    /// Instance method call (`->`).
    Instance,
}

impl CallType {
    /// Marker text as it appears between class and function.
    pub fn as_str(self) -> &'static str {
        match self {
            CallType::None => "",
            CallType::Static => "::",
            CallType::Instance => "->",
        }
    }

    /// Parse a captured marker. Unknown markers are treated as `None`.
    pub fn from_marker(marker: &str) -> Self {
        match marker.trim() {
            "::" => CallType::Static,
            "->" | "." => CallType::Instance,
            _ => CallType::None,
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured call site.
///
/// `file`, `line` and `function` are optional because capture layers do not
/// always provide them (native calls, language constructs). Consumers
/// substitute empty-string / zero defaults.
#[derive(Clone, Debug, Default)]
pub struct StackFrame {
    pub file: Option<String>,
    /// 1-based line; `0` marks an internal call.
    pub line: Option<u32>,
    pub class: Option<String>,
    pub call_type: CallType,
    pub function: Option<String>,
    pub args: Vec<RuntimeValue>,
}

impl StackFrame {
    /// Frame for a call to `function` with no location and no arguments.
    pub fn new(function: impl Into<String>) -> Self {
        StackFrame {
            function: Some(function.into()),
            ..StackFrame::default()
        }
    }

    #[must_use]
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn in_class(mut self, class: impl Into<String>, call_type: CallType) -> Self {
        self.class = Some(class.into());
        self.call_type = call_type;
        self
    }

    #[must_use]
    pub fn with_args(mut self, args: Vec<RuntimeValue>) -> Self {
        self.args = args;
        self
    }
}

/// Frames of one captured error, innermost first.
#[derive(Clone, Debug, Default)]
pub struct CallStack {
    frames: Vec<StackFrame>,
}

impl CallStack {
    pub fn new(frames: Vec<StackFrame>) -> Self {
        CallStack { frames }
    }

    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StackFrame> {
        self.frames.iter()
    }
}

impl FromIterator<StackFrame> for CallStack {
    fn from_iter<I: IntoIterator<Item = StackFrame>>(iter: I) -> Self {
        CallStack {
            frames: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CallStack {
    type Item = &'a StackFrame;
    type IntoIter = std::slice::Iter<'a, StackFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests;
