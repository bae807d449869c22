use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a configuration diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

/// A configuration diagnostic produced at schema-check time.
///
/// Checks are collected and reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckMessage {
    pub level: CheckLevel,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Label of the object the message is about, e.g. `patient.ssn`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obj: Option<String>,
    /// Stable identifier, e.g. `fields.E120`.
    pub id: String,
}

impl CheckMessage {
    pub fn new(level: CheckLevel, msg: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            level,
            msg: msg.into(),
            hint: None,
            obj: None,
            id: id.into(),
        }
    }

    pub fn error(msg: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(CheckLevel::Error, msg, id)
    }

    pub fn warning(msg: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(CheckLevel::Warning, msg, id)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_obj(mut self, obj: impl Into<String>) -> Self {
        self.obj = Some(obj.into());
        self
    }

    /// Errors and criticals block startup; warnings do not.
    pub fn is_serious(&self) -> bool {
        self.level >= CheckLevel::Error
    }
}

impl fmt::Display for CheckMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let obj = self.obj.as_deref().unwrap_or("?");
        write!(f, "{obj}: ({}) {}", self.id, self.msg)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n\tHINT: {hint}")?;
        }
        Ok(())
    }
}
