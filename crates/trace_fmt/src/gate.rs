//! Severity gating.
//!
//! Whether a trace is formatted at all is decided per error severity by the
//! notifier layer, before the pipeline runs. The pipeline itself never
//! consults the mask.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

bitflags! {
    /// Set of severities for which a trace is rendered.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct SeverityMask: u32 {
        const ERROR = 1 << 0;
        const WARNING = 1 << 1;
        const PARSE = 1 << 2;
        const NOTICE = 1 << 3;
        const CORE_ERROR = 1 << 4;
        const CORE_WARNING = 1 << 5;
        const COMPILE_ERROR = 1 << 6;
        const COMPILE_WARNING = 1 << 7;
        const USER_ERROR = 1 << 8;
        const USER_WARNING = 1 << 9;
        const USER_NOTICE = 1 << 10;
        const STRICT = 1 << 11;
        const RECOVERABLE_ERROR = 1 << 12;
        const DEPRECATED = 1 << 13;
        const USER_DEPRECATED = 1 << 14;
        /// Uncaught exceptions.
        const EXCEPTION = 1 << 15;

        const ALL_ERRORS = Self::ERROR.bits()
            | Self::CORE_ERROR.bits()
            | Self::COMPILE_ERROR.bits()
            | Self::USER_ERROR.bits()
            | Self::RECOVERABLE_ERROR.bits()
            | Self::EXCEPTION.bits();
        const ALL_WARNINGS = Self::WARNING.bits()
            | Self::CORE_WARNING.bits()
            | Self::COMPILE_WARNING.bits()
            | Self::USER_WARNING.bits();
        const ALL_NOTICES = Self::NOTICE.bits() | Self::USER_NOTICE.bits();
        const ALL_DEPRECATIONS = Self::STRICT.bits()
            | Self::DEPRECATED.bits()
            | Self::USER_DEPRECATED.bits();
    }
}

/// Severity of one reported error. Each maps to exactly one mask bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Parse,
    Notice,
    CoreError,
    CoreWarning,
    CompileError,
    CompileWarning,
    UserError,
    UserWarning,
    UserNotice,
    Strict,
    RecoverableError,
    Deprecated,
    UserDeprecated,
    Exception,
}

impl Severity {
    pub fn flag(self) -> SeverityMask {
        match self {
            Severity::Error => SeverityMask::ERROR,
            Severity::Warning => SeverityMask::WARNING,
            Severity::Parse => SeverityMask::PARSE,
            Severity::Notice => SeverityMask::NOTICE,
            Severity::CoreError => SeverityMask::CORE_ERROR,
            Severity::CoreWarning => SeverityMask::CORE_WARNING,
            Severity::CompileError => SeverityMask::COMPILE_ERROR,
            Severity::CompileWarning => SeverityMask::COMPILE_WARNING,
            Severity::UserError => SeverityMask::USER_ERROR,
            Severity::UserWarning => SeverityMask::USER_WARNING,
            Severity::UserNotice => SeverityMask::USER_NOTICE,
            Severity::Strict => SeverityMask::STRICT,
            Severity::RecoverableError => SeverityMask::RECOVERABLE_ERROR,
            Severity::Deprecated => SeverityMask::DEPRECATED,
            Severity::UserDeprecated => SeverityMask::USER_DEPRECATED,
            Severity::Exception => SeverityMask::EXCEPTION,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Parse => "parse",
            Severity::Notice => "notice",
            Severity::CoreError => "core_error",
            Severity::CoreWarning => "core_warning",
            Severity::CompileError => "compile_error",
            Severity::CompileWarning => "compile_warning",
            Severity::UserError => "user_error",
            Severity::UserWarning => "user_warning",
            Severity::UserNotice => "user_notice",
            Severity::Strict => "strict",
            Severity::RecoverableError => "recoverable_error",
            Severity::Deprecated => "deprecated",
            Severity::UserDeprecated => "user_deprecated",
            Severity::Exception => "exception",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown severity name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownSeverity(pub String);

impl fmt::Display for UnknownSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown severity `{}`", self.0)
    }
}

impl std::error::Error for UnknownSeverity {}

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_SEVERITIES
            .iter()
            .copied()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSeverity(s.to_string()))
    }
}

const ALL_SEVERITIES: [Severity; 16] = [
    Severity::Error,
    Severity::Warning,
    Severity::Parse,
    Severity::Notice,
    Severity::CoreError,
    Severity::CoreWarning,
    Severity::CompileError,
    Severity::CompileWarning,
    Severity::UserError,
    Severity::UserWarning,
    Severity::UserNotice,
    Severity::Strict,
    Severity::RecoverableError,
    Severity::Deprecated,
    Severity::UserDeprecated,
    Severity::Exception,
];

impl SeverityMask {
    /// Whether a trace should be rendered for `severity`.
    pub fn allows(self, severity: Severity) -> bool {
        self.contains(severity.flag())
    }

    /// Parse a list of severity names or group names (`all`, `errors`,
    /// `warnings`, `notices`, `deprecations`).
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, UnknownSeverity> {
        names.iter().try_fold(SeverityMask::empty(), |mask, name| {
            let flag = match name.as_ref().trim().to_ascii_lowercase().as_str() {
                "all" => SeverityMask::all(),
                "errors" => SeverityMask::ALL_ERRORS,
                "warnings" => SeverityMask::ALL_WARNINGS,
                "notices" => SeverityMask::ALL_NOTICES,
                "deprecations" => SeverityMask::ALL_DEPRECATIONS,
                other => other.parse::<Severity>()?.flag(),
            };
            Ok(mask | flag)
        })
    }
}

#[cfg(test)]
mod tests;
