//! Portfolio content.
//!
//! This module handles:
//! - The content model (sections, blocks, nav items)
//! - Loading content from JSON5 files or the built-in portfolio
//! - Laying content out into rows with per-section geometry

mod layout;

pub use layout::{Document, LineKind, RenderedLine, SectionSpan, wrap_text, wrap_words};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Portfolio shown when no content file is given.
const BUILTIN_PORTFOLIO: &str = include_str!("../../assets/portfolio.json5");

/// Errors raised while loading portfolio content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid portfolio content: {0}")]
    Parse(#[from] json5::Error),
    #[error("portfolio has no sections")]
    NoSections,
    #[error("section id {0:?} is used more than once")]
    DuplicateSection(String),
    #[error("section id must not be empty")]
    EmptySectionId,
}

/// One entry of the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    /// Section id this item scrolls to
    pub target: String,
    /// Text shown in the bar
    pub label: String,
}

/// A titled block of content with a stable id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// Content pieces a section is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Owner name and headline banner
    Hero,
    Paragraph {
        text: String,
    },
    Heading {
        text: String,
    },
    /// Secondary line such as dates or an affiliation
    Meta {
        text: String,
    },
    Bullets {
        items: Vec<String>,
    },
    Tags {
        #[serde(default)]
        label: Option<String>,
        items: Vec<String>,
    },
    /// A titled item with optional details (project, job, degree)
    Entry {
        title: String,
        #[serde(default)]
        meta: Option<String>,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        tags: Vec<String>,
        #[serde(default)]
        bullets: Vec<String>,
    },
    Link {
        label: String,
        url: String,
    },
    /// Where the contact form can be opened from
    ContactForm,
}

/// The whole portfolio document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    pub owner: String,
    /// Short mark shown at the left of the nav bar
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub headline: String,
    /// Recipient for contact form messages
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub nav: Vec<NavItem>,
    pub sections: Vec<Section>,
}

impl Portfolio {
    /// The portfolio bundled with the binary.
    ///
    /// # Errors
    /// Returns an error if the bundled content fails validation.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::parse(BUILTIN_PORTFOLIO)
    }

    /// Parse and validate JSON5 portfolio content.
    ///
    /// # Errors
    /// Returns an error on malformed JSON5, an empty section list, or
    /// empty/duplicate section ids.
    pub fn parse(text: &str) -> Result<Self, ContentError> {
        let portfolio: Self = json5::from_str(text)?;
        portfolio.validate()?;
        for target in portfolio.dangling_nav_targets() {
            warn!(target, "nav item points at a section that does not exist");
        }
        Ok(portfolio)
    }

    /// Read and parse a portfolio file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let text = std::fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    fn validate(&self) -> Result<(), ContentError> {
        if self.sections.is_empty() {
            return Err(ContentError::NoSections);
        }
        let mut seen = HashSet::new();
        for section in &self.sections {
            if section.id.trim().is_empty() {
                return Err(ContentError::EmptySectionId);
            }
            if !seen.insert(section.id.as_str()) {
                return Err(ContentError::DuplicateSection(section.id.clone()));
            }
        }
        Ok(())
    }

    /// Nav items in display order.
    ///
    /// Falls back to one item per section when the content lists none.
    pub fn nav_items(&self) -> Vec<NavItem> {
        if !self.nav.is_empty() {
            return self.nav.clone();
        }
        self.sections
            .iter()
            .map(|section| NavItem {
                target: section.id.clone(),
                label: section
                    .title
                    .clone()
                    .unwrap_or_else(|| capitalize(&section.id)),
            })
            .collect()
    }

    /// Nav targets with no matching section.
    pub fn dangling_nav_targets(&self) -> Vec<&str> {
        self.nav
            .iter()
            .map(|item| item.target.as_str())
            .filter(|target| !self.sections.iter().any(|s| s.id == *target))
            .collect()
    }

    /// Brand mark, defaulting to the owner's initials.
    pub fn brand(&self) -> String {
        self.brand.clone().unwrap_or_else(|| {
            self.owner
                .split_whitespace()
                .filter_map(|word| word.chars().next())
                .flat_map(char::to_uppercase)
                .collect()
        })
    }

    /// Section that is active before any scrolling happens.
    pub fn initial_section_id(&self) -> &str {
        self.sections
            .first()
            .map_or("home", |section| section.id.as_str())
    }

    pub fn has_contact_form(&self) -> bool {
        self.sections
            .iter()
            .flat_map(|section| &section.blocks)
            .any(|block| matches!(block, Block::ContactForm))
    }
}

fn capitalize(id: &str) -> String {
    let mut chars = id.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
