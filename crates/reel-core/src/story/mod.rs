//! Story library: pre-authored transcripts and their resolution.
//!
//! A story is an ordered message list authored in one or more languages.
//! The library always contains the embedded default stories; a configured
//! stories directory can add to or replace them. Resolution never fails:
//! unknown ids and missing languages fall back instead of erroring, so the
//! player never receives an absent transcript.

pub mod message;

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use message::{Media, MediaKind, Message};

/// A full ordered message list, shared by reference.
///
/// Pointer identity (not content equality) is what the playback controller
/// compares: resolving the same story twice yields the same `Arc`, so only a
/// genuine selection change restarts playback.
pub type Transcript = Arc<Vec<Message>>;

/// Languages stories are authored in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pt,
}

impl Language {
    /// Cycles to the other language (the TUI's `l` key).
    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Pt,
            Language::Pt => Language::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Pt => write!(f, "pt"),
        }
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "pt" => Ok(Language::Pt),
            other => anyhow::bail!("unknown language '{other}' (expected 'en' or 'pt')"),
        }
    }
}

/// On-disk story file shape.
#[derive(Debug, Deserialize)]
struct StoryFile {
    id: String,
    name: String,
    languages: BTreeMap<Language, Vec<Message>>,
}

/// A pre-authored conversation in one or more languages.
#[derive(Debug, Clone)]
pub struct Story {
    pub id: String,
    pub name: String,
    languages: BTreeMap<Language, Transcript>,
}

impl Story {
    fn from_file(file: StoryFile) -> Self {
        Self {
            id: file.id,
            name: file.name,
            languages: file
                .languages
                .into_iter()
                .map(|(language, messages)| (language, Arc::new(messages)))
                .collect(),
        }
    }

    /// Languages this story is authored in.
    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.languages.keys().copied()
    }

    /// Message count for a language, 0 if not authored.
    pub fn message_count(&self, language: Language) -> usize {
        self.languages.get(&language).map_or(0, |t| t.len())
    }

    /// The transcript for `language`, falling back to English, then to any
    /// authored list. Only a story with no languages at all yields an empty
    /// transcript.
    pub fn transcript(&self, language: Language) -> Transcript {
        if let Some(transcript) = self.languages.get(&language) {
            return Arc::clone(transcript);
        }
        if let Some(transcript) = self.languages.get(&Language::En) {
            tracing::warn!(story = %self.id, %language, "language not authored, using en");
            return Arc::clone(transcript);
        }
        if let Some(transcript) = self.languages.values().next() {
            return Arc::clone(transcript);
        }
        Arc::default()
    }
}

/// A non-fatal problem found while loading stories from a directory.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Result of building a library: the library plus any per-file warnings.
#[derive(Debug)]
pub struct LoadOutcome {
    pub library: StoryLibrary,
    pub warnings: Vec<LoadWarning>,
}

/// All stories known to this run, in presentation order.
#[derive(Debug, Clone)]
pub struct StoryLibrary {
    stories: Vec<Story>,
}

/// Default stories compiled into the binary.
const EMBEDDED_STORIES: &[(&str, &str)] = &[
    ("welcome.json", include_str!("../../assets/welcome.json")),
    ("support.json", include_str!("../../assets/support.json")),
    ("launch.json", include_str!("../../assets/launch.json")),
];

impl StoryLibrary {
    /// Builds the library from the embedded stories plus an optional
    /// directory of story files. A directory story whose id matches an
    /// embedded one replaces it.
    pub fn load(stories_dir: Option<&Path>) -> Result<LoadOutcome> {
        let mut stories = Vec::new();
        for (name, raw) in EMBEDDED_STORIES {
            let file: StoryFile = serde_json::from_str(raw)
                .with_context(|| format!("embedded story {name} is malformed"))?;
            stories.push(Story::from_file(file));
        }

        let mut warnings = Vec::new();
        if let Some(dir) = stories_dir {
            load_dir(dir, &mut stories, &mut warnings);
        }

        Ok(LoadOutcome {
            library: StoryLibrary { stories },
            warnings,
        })
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn get(&self, id: &str) -> Option<&Story> {
        self.stories.iter().find(|story| story.id == id)
    }

    /// Index of a story id within presentation order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.stories.iter().position(|story| story.id == id)
    }

    /// Resolves `(story id, language)` to a transcript.
    ///
    /// An unknown id falls back to the first story; the library always holds
    /// the embedded stories, so resolution cannot fail. Repeated resolution
    /// of the same pair returns the same `Arc`.
    pub fn resolve(&self, id: &str, language: Language) -> Transcript {
        let story = self.get(id).unwrap_or_else(|| {
            tracing::warn!(story = id, "unknown story id, using default");
            &self.stories[0]
        });
        story.transcript(language)
    }
}

fn load_dir(dir: &Path, stories: &mut Vec<Story>, warnings: &mut Vec<LoadWarning>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warnings.push(LoadWarning {
                path: dir.to_path_buf(),
                message: format!("cannot read stories directory: {err}"),
            });
            return;
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    for path in paths {
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                warnings.push(LoadWarning {
                    path,
                    message: format!("cannot read story file: {err}"),
                });
                continue;
            }
        };
        let file: StoryFile = match serde_json::from_str(&raw) {
            Ok(file) => file,
            Err(err) => {
                warnings.push(LoadWarning {
                    path,
                    message: format!("invalid story JSON: {err}"),
                });
                continue;
            }
        };
        let story = Story::from_file(file);
        if let Some(index) = stories.iter().position(|s| s.id == story.id) {
            stories[index] = story;
        } else {
            stories.push(story);
        }
    }
}
