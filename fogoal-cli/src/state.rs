use anyhow::{Context, Result};
use fogoal_core::Task;
use std::fs;
use std::path::{Path, PathBuf};

/// `$FOGOAL_HOME`, else `~/.fogoal`.
pub fn fogoal_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FOGOAL_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".fogoal"))
}

pub fn ensure_fogoal_home() -> Result<PathBuf> {
    let dir = fogoal_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Read a task list in the app's JSON export shape (array of tasks).
pub fn read_tasks(path: &Path) -> Result<Vec<Task>> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse tasks in {}", path.display()))
}

pub fn write_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    let mut json = serde_json::to_string_pretty(tasks).context("serialize tasks")?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
