use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Result, SoundboardError};

/// Identifier for one of the fixed set of clips on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundId {
    Dog,
    Clap,
    Pop,
    Laugh,
    Bell,
    Horn,
}

impl SoundId {
    pub const ALL: [SoundId; 6] = [
        SoundId::Dog,
        SoundId::Clap,
        SoundId::Pop,
        SoundId::Laugh,
        SoundId::Bell,
        SoundId::Horn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SoundId::Dog => "dog",
            SoundId::Clap => "clap",
            SoundId::Pop => "pop",
            SoundId::Laugh => "laugh",
            SoundId::Bell => "bell",
            SoundId::Horn => "horn",
        }
    }

    /// Maps a single-letter shortcut to its sound. Case-insensitive, so the
    /// shortcut works regardless of shift state.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_uppercase() {
            'D' => Some(SoundId::Dog),
            'C' => Some(SoundId::Clap),
            'P' => Some(SoundId::Pop),
            'L' => Some(SoundId::Laugh),
            'B' => Some(SoundId::Bell),
            'H' => Some(SoundId::Horn),
            _ => None,
        }
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundId {
    type Err = SoundboardError;

    fn from_str(value: &str) -> Result<Self> {
        SoundId::ALL
            .into_iter()
            .find(|id| id.as_str() == value.to_ascii_lowercase())
            .ok_or_else(|| SoundboardError::msg(format!("unknown sound `{value}`")))
    }
}

/// Immutable mapping from sound identifiers to clip files, fixed at startup.
#[derive(Debug, Clone)]
pub struct SoundLibrary {
    clips: HashMap<SoundId, PathBuf>,
}

impl SoundLibrary {
    /// Builds the standard six-clip table rooted at `root`, one
    /// `<id>.mp3` per identifier.
    pub fn with_default_clips(root: &Path) -> Self {
        let clips = SoundId::ALL
            .into_iter()
            .map(|id| (id, root.join(format!("{}.mp3", id.as_str()))))
            .collect();
        Self { clips }
    }

    pub fn clip_path(&self, id: SoundId) -> Result<&Path> {
        self.clips
            .get(&id)
            .map(PathBuf::as_path)
            .ok_or_else(|| SoundboardError::msg(format!("no clip registered for `{id}`")))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SoundId, &Path)> {
        SoundId::ALL
            .into_iter()
            .filter_map(|id| self.clips.get(&id).map(|path| (id, path.as_path())))
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
