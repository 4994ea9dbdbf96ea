//! Serialized document value
//!
//! The editor side never looks inside a plan. It holds the engine's output as
//! an immutable blob and hands it back verbatim on the next boundary call.

use std::fmt;
use std::sync::Arc;

/// Opaque, immutable text of one complete document state
///
/// Cloning is cheap (shared buffer), so the same snapshot can sit in the
/// store and in a history stack at once. Equality is byte-for-byte.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SerializedDocument(Arc<str>);

impl SerializedDocument {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SerializedDocument {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for SerializedDocument {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl AsRef<str> for SerializedDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SerializedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Documents can be large; keep debug output readable in logs and assertions.
impl fmt::Debug for SerializedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 64;
        let preview: String = self.0.chars().take(PREVIEW).collect();
        if preview.len() < self.0.len() {
            write!(f, "SerializedDocument({:?}… {} bytes)", preview, self.0.len())
        } else {
            write!(f, "SerializedDocument({:?})", preview)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_buffer() {
        let doc = SerializedDocument::from("{\"name\":\"New Plan\"}");
        let copy = doc.clone();
        assert_eq!(doc, copy);
        assert!(std::ptr::eq(doc.as_str(), copy.as_str()));
    }

    #[test]
    fn test_equality_is_byte_for_byte() {
        let a = SerializedDocument::from("{\"a\":1}");
        let b = SerializedDocument::from("{\"a\": 1}");
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_truncates_long_documents() {
        let doc = SerializedDocument::from("x".repeat(500));
        let debug = format!("{:?}", doc);
        assert!(debug.contains("500 bytes"));
        assert!(debug.len() < 200);
    }
}
