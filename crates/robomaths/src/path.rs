//! Storage-path derivation for chapter resources
//!
//! Every resource lives in the bucket under
//! `{level}/{chapter-slug}/{kind}/{file}`, mirroring the lycee hierarchy of
//! the site. Derivation is pure: same inputs, same path, no I/O.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::slug::slugify;

/// School level, the first path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Seconde,
    Premiere,
    Terminale,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Seconde => "seconde",
            Level::Premiere => "premiere",
            Level::Terminale => "terminale",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown level: {0}")]
pub struct UnknownLevel(String);

impl FromStr for Level {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seconde" => Ok(Level::Seconde),
            "premiere" => Ok(Level::Premiere),
            "terminale" => Ok(Level::Terminale),
            other => Err(UnknownLevel(other.to_string())),
        }
    }
}

/// Kind of teaching material, the third path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Cours,
    Exercices,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Cours => "cours",
            ResourceKind::Exercices => "exercices",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown resource kind: {0}")]
pub struct UnknownKind(String);

impl FromStr for ResourceKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cours" => Ok(ResourceKind::Cours),
            "exercices" => Ok(ResourceKind::Exercices),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// Source format a resource is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Tex,
    Docx,
    Pdf,
}

impl Format {
    /// Fixed ordering used for batch uploads and reporting.
    pub const ALL: [Format; 3] = [Format::Tex, Format::Docx, Format::Pdf];

    /// File extension, also the reporting key in batch results.
    pub fn ext(&self) -> &'static str {
        match self {
            Format::Tex => "tex",
            Format::Docx => "docx",
            Format::Pdf => "pdf",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ext())
    }
}

/// Canonical file name for a resource: `{chapter-slug}_{kind}.{ext}`.
pub fn file_name(chapter: &str, kind: ResourceKind, format: Format) -> String {
    format!("{}_{}.{}", slugify(chapter), kind, format.ext())
}

/// Full storage path: `{level}/{chapter-slug}/{kind}/{file_name}`.
pub fn build_path(level: Level, chapter: &str, kind: ResourceKind, file_name: &str) -> String {
    format!("{}/{}/{}/{}", level, slugify(chapter), kind, file_name)
}

/// Listing prefix, built progressively: `level[/chapter-slug[/kind]]`.
///
/// The kind segment is only appended when a chapter is present.
pub fn prefix(level: Level, chapter: Option<&str>, kind: Option<ResourceKind>) -> String {
    let mut prefix = level.to_string();
    if let Some(chapter) = chapter {
        prefix.push('/');
        prefix.push_str(&slugify(chapter));
        if let Some(kind) = kind {
            prefix.push('/');
            prefix.push_str(kind.as_str());
        }
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_derivation() {
        assert_eq!(
            file_name("Suites Numériques", ResourceKind::Cours, Format::Pdf),
            "suites-numeriques_cours.pdf"
        );
        assert_eq!(
            file_name("Probabilités", ResourceKind::Exercices, Format::Tex),
            "probabilites_exercices.tex"
        );
    }

    #[test]
    fn test_build_path() {
        assert_eq!(
            build_path(
                Level::Seconde,
                "Suites Numériques",
                ResourceKind::Cours,
                "suites-numeriques_cours.pdf"
            ),
            "seconde/suites-numeriques/cours/suites-numeriques_cours.pdf"
        );
    }

    #[test]
    fn test_prefix_progressive() {
        assert_eq!(prefix(Level::Terminale, None, None), "terminale");
        assert_eq!(
            prefix(Level::Terminale, Some("Probabilités"), None),
            "terminale/probabilites"
        );
        assert_eq!(
            prefix(
                Level::Terminale,
                Some("Probabilités"),
                Some(ResourceKind::Exercices)
            ),
            "terminale/probabilites/exercices"
        );
        // Kind alone does not extend the prefix
        assert_eq!(
            prefix(Level::Terminale, None, Some(ResourceKind::Cours)),
            "terminale"
        );
    }

    #[test]
    fn test_level_round_trip() {
        for level in [Level::Seconde, Level::Premiere, Level::Terminale] {
            assert_eq!(level.as_str().parse::<Level>().unwrap(), level);
        }
        assert!("sixieme".parse::<Level>().is_err());
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in [ResourceKind::Cours, ResourceKind::Exercices] {
            assert_eq!(kind.as_str().parse::<ResourceKind>().unwrap(), kind);
        }
        assert!("controles".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(serde_json::to_string(&Level::Premiere).unwrap(), "\"premiere\"");
        assert_eq!(
            serde_json::to_string(&ResourceKind::Exercices).unwrap(),
            "\"exercices\""
        );
        assert_eq!(serde_json::to_string(&Format::Docx).unwrap(), "\"docx\"");
    }

    #[test]
    fn test_format_ordering() {
        let exts: Vec<_> = Format::ALL.iter().map(|f| f.ext()).collect();
        assert_eq!(exts, ["tex", "docx", "pdf"]);
    }
}
