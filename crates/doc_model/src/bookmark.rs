//! Bookmarks and hyperlinks - named anchors owned by a paragraph

use serde::{Deserialize, Serialize};

/// A named anchor over a byte range of its owning paragraph's text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub name: String,
    /// Byte range `(start, end)` within the paragraph text
    pub range: (usize, usize),
}

impl Bookmark {
    pub fn new(name: impl Into<String>, range: (usize, usize)) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }

    /// A zero-width bookmark at a single position
    pub fn point(name: impl Into<String>, at: usize) -> Self {
        Self::new(name, (at, at))
    }
}

/// Target of a hyperlink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LinkTarget {
    /// External URI
    Uri { uri: String },
    /// Reference to a bookmark by name
    Bookmark { name: String },
}

impl LinkTarget {
    pub fn uri(uri: impl Into<String>) -> Self {
        LinkTarget::Uri { uri: uri.into() }
    }

    pub fn bookmark(name: impl Into<String>) -> Self {
        LinkTarget::Bookmark { name: name.into() }
    }

    /// URL representation of this target, percent-encoded where needed
    pub fn to_url(&self) -> String {
        match self {
            LinkTarget::Uri { uri } => uri.clone(),
            LinkTarget::Bookmark { name } => format!("#{}", urlencoding::encode(name)),
        }
    }

    /// Reject empty and known-dangerous targets
    pub fn validate(&self) -> Result<(), String> {
        match self {
            LinkTarget::Uri { uri } => {
                if uri.is_empty() {
                    return Err("hyperlink URI is empty".to_string());
                }
                let lower = uri.to_lowercase();
                if lower.starts_with("javascript:")
                    || lower.starts_with("data:")
                    || lower.starts_with("vbscript:")
                {
                    return Err(format!("unsafe hyperlink protocol in '{}'", uri));
                }
                Ok(())
            }
            LinkTarget::Bookmark { name } => {
                if name.is_empty() {
                    Err("bookmark reference is empty".to_string())
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// A hyperlink over a byte range of its owning paragraph's text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    pub target: LinkTarget,
    /// Byte range `(start, end)` within the paragraph text
    pub range: (usize, usize),
}

impl Hyperlink {
    pub fn new(target: LinkTarget, range: (usize, usize)) -> Self {
        Self { target, range }
    }
}
