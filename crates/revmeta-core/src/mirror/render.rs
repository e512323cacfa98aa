//! Render: format a revision's tracked metadata for the comparison view

use std::sync::Arc;

use revmeta_store::{ItemId, MetaStore, MetaValue};

use super::RevisionMirror;
use crate::error::Result;
use crate::registry::KeyDescriptor;

/// Id of the synthetic comparison field owned by the mirror
pub const FIELD_ID: &str = "postmeta";

/// Label shown for [`FIELD_ID`] in the comparison view
pub const FIELD_LABEL: &str = "Post Meta";

/// Shown in place of a key that has no stored values
pub const EMPTY_PLACEHOLDER: &str = "*empty postmeta value*";

const LIST_STYLE: &str = "white-space: normal; margin-left: 1.5em; list-style: disc outside;";

/// Host hook applied to escaped generic renderings.
///
/// Called with the escaped text, the key and the unserialized value;
/// returns the markup to embed.
pub type DisplayFilter = Arc<dyn Fn(String, &str, &MetaValue) -> String + Send + Sync>;

/// Wrap a closure as a [`DisplayFilter`]
pub fn display_filter<F>(f: F) -> DisplayFilter
where
    F: Fn(String, &str, &MetaValue) -> String + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Ordered list of comparison fields, `(id, label)`.
///
/// Inserting an id that is already present replaces its label in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionFields {
    fields: Vec<(String, String)>,
}

impl RevisionFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, label: impl Into<String>) {
        let id = id.into();
        let label = label.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, existing_label)) => *existing_label = label,
            None => self.fields.push((id, label)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, label)| label.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field ids in display order
    pub fn ids(&self) -> Vec<&str> {
        self.fields.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(id, label)| (id.as_str(), label.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for RevisionFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (id, label) in iter {
            fields.insert(id, label);
        }
        fields
    }
}

/// Escape `& < > " '` for embedding in markup
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

impl RevisionMirror {
    /// Add the mirror's synthetic field to the comparison field list
    pub fn revision_fields(&self, fields: &mut RevisionFields) {
        fields.insert(FIELD_ID, FIELD_LABEL);
    }

    /// Render the synthetic field for `revision`.
    ///
    /// Returns `None` for any other field, or when nothing is tracked, so
    /// the host falls back to its own rendering. Otherwise produces one
    /// collapsible list entry per tracked key. Output from custom renderers
    /// is embedded as is; generic renderings are escaped and passed
    /// through the display filter.
    pub fn render_field<S>(&self, store: &S, field: &str, revision: ItemId) -> Result<Option<String>>
    where
        S: MetaStore + ?Sized,
    {
        if field != FIELD_ID || !self.has_keys() {
            return Ok(None);
        }

        let mut html = format!("<ul style=\"{}\">", LIST_STYLE);
        for descriptor in &self.registry {
            let values = store.get(revision, descriptor.key())?;
            let body = if values.is_empty() {
                EMPTY_PLACEHOLDER.to_string()
            } else {
                values
                    .iter()
                    .map(|value| self.render_value(descriptor, value))
                    .collect()
            };

            let anchor = escape_html(&format!("postmeta-{}", descriptor.key()));
            html.push_str(&format!(
                "\n<li>\n<h3><a href=\"#{anchor}\" onclick=\"jQuery('#{anchor}').slideToggle(); return false;\">{label}</a></h3>\n<div id=\"{anchor}\" style=\"display: none;\">{body}</div>\n</li>\n",
                anchor = anchor,
                label = escape_html(descriptor.key()),
                body = body,
            ));
        }
        html.push_str("</ul>");

        Ok(Some(html))
    }

    fn render_value(&self, descriptor: &KeyDescriptor, stored: &MetaValue) -> String {
        let value = stored.maybe_unserialize();
        let mut out = String::from("<div>");
        if !value.is_empty_like() {
            match descriptor.renderer() {
                Some(render) => out.push_str(&render(&value)),
                None => {
                    let escaped = escape_html(&value.to_string());
                    out.push_str(&self.filter_display(escaped, descriptor.key(), &value));
                }
            }
        }
        out.push_str("</div>");
        out
    }
}
