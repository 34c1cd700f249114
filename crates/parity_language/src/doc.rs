//! Documentation comments.
//!
//! `/** ... */` comments are parsed into a summary and a list of block tags.
//! The `@stubbed` tag marks a declaration that exists only as a placeholder.

/// Name of the tag that marks a declaration as an intentional stub.
pub const STUB_TAG: &str = "stubbed";

/// A block tag such as `@param name description`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocTag {
    /// Tag name without the `@`.
    pub name: String,
    /// Everything after the tag name, trimmed.
    pub text: String,
}

/// A parsed documentation comment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocComment {
    /// Text before the first block tag.
    pub summary: String,
    /// Block tags in source order.
    pub tags: Vec<DocTag>,
}

impl DocComment {
    /// Parses a raw `/** ... */` comment.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let body = raw.strip_prefix("/**").unwrap_or(raw);
        let body = body.strip_suffix("*/").unwrap_or(body);

        let mut summary = Vec::new();
        let mut tags: Vec<DocTag> = Vec::new();

        for line in body.lines() {
            let line = line.trim_start();
            let line = line.strip_prefix('*').unwrap_or(line).trim();
            if let Some(tag) = line.strip_prefix('@') {
                let (name, text) = tag
                    .split_once(char::is_whitespace)
                    .unwrap_or((tag, ""));
                tags.push(DocTag {
                    name: name.to_string(),
                    text: text.trim().to_string(),
                });
            } else if let Some(last) = tags.last_mut() {
                if !line.is_empty() {
                    if !last.text.is_empty() {
                        last.text.push(' ');
                    }
                    last.text.push_str(line);
                }
            } else {
                summary.push(line);
            }
        }

        Self {
            summary: summary.join("\n").trim().to_string(),
            tags,
        }
    }

    /// Returns true if a tag named `name` is present.
    #[must_use]
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }

    /// Returns the first tag named `name`.
    #[must_use]
    pub fn tag(&self, name: &str) -> Option<&DocTag> {
        self.tags.iter().find(|t| t.name == name)
    }

    /// Returns true if the comment carries the stub marker.
    #[must_use]
    pub fn is_stubbed(&self) -> bool {
        self.has_tag(STUB_TAG)
    }

    /// Merges another comment into this one; tags accumulate, the later
    /// summary wins when present.
    pub fn merge(&mut self, other: Self) {
        if !other.summary.is_empty() {
            self.summary = other.summary;
        }
        self.tags.extend(other.tags);
    }
}
