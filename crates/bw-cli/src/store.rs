//! Character files on disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use bw_core::{Character, RelationshipId, SkillId, StatName, TraitRef};
use bw_mechanics::{CharacterStore, MechResult, TraitUpdate};
use tempfile::NamedTempFile;

/// Load a character file.
pub fn load(path: &Path) -> Result<Character, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Character::from_json(&text).map_err(|e| format!("invalid character file {}: {e}", path.display()))
}

/// Write a character file atomically: a temp file in the same directory is
/// written in full, then moved over the original.
pub fn save(path: &Path, character: &Character) -> MechResult<()> {
    let json = character.to_json_pretty()?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// A character store backed by a JSON file. Every accepted update is written
/// to disk before it becomes visible.
pub struct JsonFileStore {
    path: PathBuf,
    character: Character,
}

impl JsonFileStore {
    pub fn open(path: &Path) -> Result<Self, String> {
        Ok(Self {
            path: path.to_path_buf(),
            character: load(path)?,
        })
    }

    fn commit(&mut self, change: impl FnOnce(&mut Character) -> MechResult<()>) -> MechResult<()> {
        let mut next = self.character.clone();
        change(&mut next)?;
        save(&self.path, &next)?;
        self.character = next;
        Ok(())
    }
}

impl CharacterStore for JsonFileStore {
    fn character(&self) -> &Character {
        &self.character
    }

    fn update_trait(&mut self, target: TraitRef, update: TraitUpdate) -> MechResult<()> {
        self.commit(|c| c.update_trait(target, update))
    }

    fn update_tax(&mut self, stat: StatName, tax: u32) -> MechResult<()> {
        self.commit(|c| c.update_tax(stat, tax))
    }

    fn update_learning_progress(&mut self, skill: SkillId, progress: u32) -> MechResult<()> {
        self.commit(|c| c.update_learning_progress(skill, progress))
    }

    fn update_relationship_progress(
        &mut self,
        relationship: RelationshipId,
        progress: u32,
    ) -> MechResult<()> {
        self.commit(|c| c.update_relationship_progress(relationship, progress))
    }

    fn update_fate(&mut self, fate: u32) -> MechResult<()> {
        self.commit(|c| c.update_fate(fate))
    }
}
