//! Style registry - named styles and their inherited defaults

use crate::{Alignment, RunProperties};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What kind of element a style applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    Paragraph,
    Character,
    Table,
}

/// A named style with the defaults elements inherit when they carry no
/// direct formatting overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub name: String,
    pub kind: StyleKind,
    /// Run-level defaults contributed by this style
    #[serde(default)]
    pub run_defaults: RunProperties,
    /// Paragraph alignment default
    #[serde(default)]
    pub alignment: Option<Alignment>,
}

impl Style {
    pub fn paragraph(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StyleKind::Paragraph,
            run_defaults: RunProperties::default(),
            alignment: None,
        }
    }

    pub fn character(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StyleKind::Character,
            run_defaults: RunProperties::default(),
            alignment: None,
        }
    }

    pub fn table(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StyleKind::Table,
            run_defaults: RunProperties::default(),
            alignment: None,
        }
    }

    pub fn with_run_defaults(mut self, defaults: RunProperties) -> Self {
        self.run_defaults = defaults;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }
}

/// Registry of the styles known to one document.
///
/// Applying a style name that is not registered is an error at the
/// mutation-engine level (`UnknownStyle`); the registry itself only
/// answers lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleRegistry {
    styles: HashMap<String, Style>,
}

impl StyleRegistry {
    /// Create a registry seeded with the built-in styles
    pub fn new() -> Self {
        let mut registry = Self {
            styles: HashMap::new(),
        };
        for style in Self::built_ins() {
            registry.register(style);
        }
        registry
    }

    fn built_ins() -> Vec<Style> {
        let mut styles = vec![
            Style::paragraph("Normal"),
            Style::paragraph("Title").with_run_defaults(RunProperties {
                bold: Some(true),
                font_size: Some(28.0),
                ..Default::default()
            }),
            Style::paragraph("Subtitle").with_run_defaults(RunProperties {
                italic: Some(true),
                font_size: Some(15.0),
                ..Default::default()
            }),
            Style::paragraph("Quote").with_run_defaults(RunProperties {
                italic: Some(true),
                ..Default::default()
            }),
            Style::character("Emphasis").with_run_defaults(RunProperties {
                italic: Some(true),
                ..Default::default()
            }),
            Style::character("Strong").with_run_defaults(RunProperties {
                bold: Some(true),
                ..Default::default()
            }),
            Style::table("Table Grid"),
        ];
        for level in 1..=6u8 {
            styles.push(
                Style::paragraph(format!("Heading {}", level)).with_run_defaults(RunProperties {
                    bold: Some(true),
                    font_size: Some(20.0 - 2.0 * f32::from(level - 1)),
                    ..Default::default()
                }),
            );
        }
        styles
    }

    /// Register or replace a style
    pub fn register(&mut self, style: Style) {
        self.styles.insert(style.name.clone(), style);
    }

    pub fn get(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    /// Run-level defaults inherited from a style; empty for unknown names
    pub fn run_defaults(&self, name: &str) -> RunProperties {
        self.styles
            .get(name)
            .map(|s| s.run_defaults.clone())
            .unwrap_or_default()
    }

    /// All registered style names, sorted for stable listings
    pub fn names_sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.styles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
