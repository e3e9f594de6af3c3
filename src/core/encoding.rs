//! Purpose: Model the optional text-encoding argument accepted by `encode`.
//! Exports: `Encoding`.
//! Role: Keeps the encode signature uniform across backends.
//! Invariants: Every built-in backend emits UTF-8; other labels are accepted and ignored.
//! Invariants: Parsing never fails; unknown labels are preserved verbatim.
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Encoding {
    #[default]
    Utf8,
    Other(String),
}

impl Encoding {
    pub fn label(&self) -> &str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Other(label) => label,
        }
    }

    pub fn is_utf8(&self) -> bool {
        matches!(self, Encoding::Utf8)
    }
}

impl FromStr for Encoding {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Ok(match normalized.as_str() {
            "" | "utf-8" | "utf8" => Encoding::Utf8,
            _ => Encoding::Other(s.trim().to_string()),
        })
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
