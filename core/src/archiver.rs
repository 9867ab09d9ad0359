// SPDX-License-Identifier: MIT OR Apache-2.0

//! Saving games as `.sgf` files and loading them back

use crate::{meta::GameMetaInformation, sgf, GameError, Result, RunningGame};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Extension of saved game files
pub const SGF_EXTENSION: &str = "sgf";

pub(crate) fn storage_error(path: &Path) -> impl FnOnce(std::io::Error) -> GameError + '_ {
    move |source| GameError::StorageUnavailable {
        path: path.to_path_buf(),
        source,
    }
}

/// File name stem for a game: its first date, or today's date
pub fn default_file_stem(meta: &GameMetaInformation) -> String {
    let date = meta
        .dates
        .first()
        .copied()
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    date.format("%Y-%m-%d").to_string()
}

/// First free path `<stem>.sgf`, `<stem>_1.sgf`, `<stem>_2.sgf`, ... in `dir`
pub fn unique_file_path(dir: &Path, stem: &str) -> PathBuf {
    let mut path = dir.join(format!("{}.{}", stem, SGF_EXTENSION));
    let mut suffix = 0u32;
    while path.exists() {
        suffix += 1;
        tracing::debug!("{:?} exists, trying suffix _{}", path, suffix);
        path = dir.join(format!("{}_{}.{}", stem, suffix, SGF_EXTENSION));
    }
    path
}

/// Saves a game as SGF into `dir`
///
/// The directory is created if needed. The file is named after `stem`, with
/// a numeric suffix appended when that name is taken, and is written through
/// a temporary file that is renamed into place.
///
/// # Returns
/// * `Result<PathBuf>` - Path of the written file on success
pub fn save_game(game: &RunningGame, dir: &Path, stem: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(storage_error(dir))?;

    let file_path = unique_file_path(dir, stem);
    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{}.{}", stem, SGF_EXTENSION));
    let tmp_path = dir.join(format!(".tmp_{}", file_name));

    let text = sgf::to_sgf_string(game);
    write_atomically(&tmp_path, &file_path, text.as_bytes())?;

    tracing::info!("Game saved to {:?} ({} bytes)", file_path, text.len());
    Ok(file_path)
}

/// Write `bytes` to `tmp_path`, then rename it to `dest`
///
/// The temporary file is removed again when any step fails.
fn write_atomically(tmp_path: &Path, dest: &Path, bytes: &[u8]) -> Result<()> {
    let written = File::create(tmp_path)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.flush()
        })
        .map_err(storage_error(tmp_path))
        .and_then(|()| std::fs::rename(tmp_path, dest).map_err(storage_error(dest)));

    if written.is_err() && tmp_path.exists() {
        if let Err(e) = std::fs::remove_file(tmp_path) {
            tracing::warn!("Could not remove {:?}: {}", tmp_path, e);
        }
    }
    written
}

/// Saves a game into `dir`, named after its date
pub fn save_game_dated(game: &RunningGame, dir: &Path) -> Result<PathBuf> {
    save_game(game, dir, &default_file_stem(game.meta()))
}

/// Load a game from an SGF file
pub fn load_game(path: &Path) -> Result<RunningGame> {
    let file = File::open(path).map_err(storage_error(path))?;
    let game = sgf::parse_reader(BufReader::new(file))?;
    tracing::info!("Loaded {:?} ({} nodes)", path, game.node_count());
    Ok(game)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_stem_uses_first_game_date() {
        let mut meta = GameMetaInformation::default();
        meta.dates = vec![
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        ];
        assert_eq!(default_file_stem(&meta), "2024-01-01");
    }

    #[test]
    fn test_save_into_unwritable_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "x").unwrap();

        let result = save_game(&RunningGame::default(), &blocker.join("games"), "g");
        assert!(matches!(result, Err(GameError::StorageUnavailable { .. })));
    }

    #[test]
    fn test_failed_rename_removes_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let tmp_path = dir.path().join(".tmp_g.sgf");
        // A non-empty directory cannot be replaced by a file
        let dest = dir.path().join("g.sgf");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join("keep"), "x").unwrap();

        let result = write_atomically(&tmp_path, &dest, b"(;GM[1])");
        assert!(matches!(result, Err(GameError::StorageUnavailable { .. })));
        assert!(!tmp_path.exists());
        assert!(dest.join("keep").exists());
    }

    #[test]
    fn test_write_atomically_leaves_only_the_destination() {
        let dir = tempfile::tempdir().unwrap();
        let tmp_path = dir.path().join(".tmp_g.sgf");
        let dest = dir.path().join("g.sgf");

        write_atomically(&tmp_path, &dest, b"(;GM[1])").unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "(;GM[1])");
        assert!(!tmp_path.exists());
    }
}
