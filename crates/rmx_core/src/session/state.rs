//! Session state machine.

use std::path::{Path, PathBuf};

use super::types::{Mode, SessionError, SessionResult};
use crate::arrangement::Arrangement;
use crate::browse::{BrowseResult, DirectoryLister, Entry};
use crate::mux::{output_path_for, RemuxError, Remuxer};
use crate::navigation::{Direction, ListContext, Navigation};
use crate::probe::Prober;
use crate::runner::AbortCheck;

/// State of one interactive session.
pub struct Session<L, P, R> {
    lister: L,
    prober: P,
    remuxer: R,
    output_suffix: String,
    current_dir: PathBuf,
    entries: Vec<Entry>,
    navigation: Navigation,
    mode: Mode,
    arrangement: Arrangement,
    opened: Option<PathBuf>,
}

impl<L, P, R> Session<L, P, R>
where
    L: DirectoryLister,
    P: Prober,
    R: Remuxer,
{
    /// Create a session. Nothing is listed until [`Session::change_dir`].
    pub fn new(lister: L, prober: P, remuxer: R, output_suffix: impl Into<String>) -> Self {
        Self {
            lister,
            prober,
            remuxer,
            output_suffix: output_suffix.into(),
            current_dir: PathBuf::new(),
            entries: Vec::new(),
            navigation: Navigation::new(),
            mode: Mode::Browsing,
            arrangement: Arrangement::new(),
            opened: None,
        }
    }

    // --- queries ---

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    /// Path of the container being inspected.
    pub fn opened_path(&self) -> Option<&Path> {
        self.opened.as_deref()
    }

    /// Entry under the file cursor.
    pub fn selected_entry(&self) -> Option<&Entry> {
        self.entries.get(self.navigation.index(ListContext::Files))
    }

    /// Display rows of the stream pane.
    pub fn stream_rows(&self) -> Vec<String> {
        self.arrangement.rows().collect()
    }

    /// Output path a save would write for the opened container.
    pub fn proposed_output(&self) -> Option<PathBuf> {
        self.opened
            .as_deref()
            .map(|input| output_path_for(input, &self.output_suffix))
    }

    // --- directory ---

    /// List `path` and make it the current directory.
    ///
    /// When `path` cannot be listed, its ancestors are tried in turn and the
    /// first listable one becomes current. The original failure is still
    /// returned so the caller can report it.
    pub fn change_dir(&mut self, path: impl Into<PathBuf>) -> SessionResult<()> {
        self.leave();

        let mut target: PathBuf = path.into();
        let mut first_error = None;

        loop {
            match self.lister.list_entries(&target) {
                Ok(entries) => {
                    self.set_entries(target, entries);
                    break;
                }
                Err(e) => {
                    tracing::warn!("Cannot list {}: {}", target.display(), e);
                    first_error.get_or_insert(e);
                    match target.parent().map(Path::to_path_buf) {
                        Some(parent) => target = parent,
                        None => {
                            self.set_entries(target, Vec::new());
                            break;
                        }
                    }
                }
            }
        }

        self.navigation.set_index(ListContext::Files, 0);
        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Re-list the current directory, keeping the file cursor where possible.
    ///
    /// When the directory can no longer be listed, falls back like
    /// [`Session::change_dir`].
    pub fn refresh(&mut self) -> SessionResult<()> {
        if let Err(e) = self.relist() {
            let dir = self.current_dir.clone();
            self.change_dir(dir)?;
            return Err(e.into());
        }
        Ok(())
    }

    /// Update the file pane only; mode and arrangement are untouched.
    fn relist(&mut self) -> BrowseResult<()> {
        let index = self.navigation.index(ListContext::Files);
        let entries = self.lister.list_entries(&self.current_dir)?;
        let dir = self.current_dir.clone();
        self.set_entries(dir, entries);
        self.navigation.set_index(ListContext::Files, index);
        Ok(())
    }

    fn set_entries(&mut self, dir: PathBuf, entries: Vec<Entry>) {
        self.current_dir = dir;
        self.entries = entries;
        self.navigation.set_bound(ListContext::Files, self.entries.len());
    }

    // --- key actions ---

    /// Move the cursor of the active pane up.
    ///
    /// While a stream is dragged, the stream moves and the cursor follows.
    pub fn cursor_up(&mut self) {
        self.step(Direction::Up);
    }

    /// Move the cursor of the active pane down.
    pub fn cursor_down(&mut self) {
        self.step(Direction::Down);
    }

    fn step(&mut self, direction: Direction) {
        if self.mode == Mode::Inspecting {
            if let Some(position) = self.arrangement.move_dragged(direction) {
                self.navigation.set_index(ListContext::Streams, position);
                return;
            }
        }
        let context = self.navigation.active_context();
        self.navigation.step(context, direction);
    }

    /// Open the entry under the file cursor.
    ///
    /// Directories become the current directory. Files are probed and their
    /// streams shown for editing. No-op while inspecting.
    pub fn enter(&mut self, abort: AbortCheck<'_>) -> SessionResult<()> {
        if self.mode == Mode::Inspecting {
            return Ok(());
        }
        let Some(entry) = self.selected_entry().cloned() else {
            return Ok(());
        };

        let path = self.current_dir.join(&entry.name);
        if entry.is_dir {
            self.change_dir(path)
        } else {
            self.open(path, abort)
        }
    }

    /// Probe the opened container again, discarding all edits.
    pub fn reload(&mut self, abort: AbortCheck<'_>) -> SessionResult<()> {
        let path = self.opened.clone().ok_or(SessionError::NothingOpened)?;
        self.open(path, abort)
    }

    fn open(&mut self, path: PathBuf, abort: AbortCheck<'_>) -> SessionResult<()> {
        self.mode = Mode::Inspecting;
        self.navigation.activate(ListContext::Streams);
        self.arrangement = Arrangement::new();
        self.opened = Some(path.clone());

        let outcome = match self.prober.probe(&path, abort).map(Arrangement::ingest) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Probe of {} failed: {}", path.display(), e);
                self.reset_stream_cursor();
                return Err(e.into());
            }
        };

        for rejected in &outcome.rejected {
            tracing::warn!("{}: {}", path.display(), rejected);
        }
        self.arrangement = outcome.arrangement;
        self.reset_stream_cursor();

        tracing::info!(
            "Opened {} ({} streams)",
            path.display(),
            self.arrangement.len()
        );
        Ok(())
    }

    fn reset_stream_cursor(&mut self) {
        self.navigation
            .set_bound(ListContext::Streams, self.arrangement.len());
        self.navigation.set_index(ListContext::Streams, 0);
    }

    /// Leave the stream pane, or go to the parent directory when browsing.
    pub fn back(&mut self) -> SessionResult<()> {
        match self.mode {
            Mode::Inspecting => {
                self.leave();
                Ok(())
            }
            Mode::Browsing => match self.current_dir.parent().map(Path::to_path_buf) {
                Some(parent) => self.change_dir(parent),
                None => Ok(()),
            },
        }
    }

    /// Drop the opened container and return to the file pane.
    fn leave(&mut self) {
        self.mode = Mode::Browsing;
        self.arrangement = Arrangement::new();
        self.opened = None;
        self.reset_stream_cursor();
        self.navigation.activate(ListContext::Files);
    }

    /// Include or exclude the stream under the cursor.
    pub fn toggle_included_at_cursor(&mut self) -> SessionResult<()> {
        self.require_opened()?;
        let position = self.navigation.index(ListContext::Streams);
        if let Err(e) = self.arrangement.toggle_included(position) {
            tracing::warn!("Toggle include ignored: {}", e);
        }
        Ok(())
    }

    /// Pick up or release the stream under the cursor.
    pub fn toggle_drag_at_cursor(&mut self) -> SessionResult<()> {
        self.require_opened()?;
        let position = self.navigation.index(ListContext::Streams);
        if let Err(e) = self.arrangement.toggle_dragged(position) {
            tracing::warn!("Toggle drag ignored: {}", e);
        }
        Ok(())
    }

    fn require_opened(&self) -> SessionResult<&Path> {
        match (self.mode, self.opened.as_deref()) {
            (Mode::Inspecting, Some(path)) => Ok(path),
            _ => Err(SessionError::NothingOpened),
        }
    }

    /// Write the remuxed copy of the opened container.
    ///
    /// The arrangement is left as it is, whatever the outcome. Returns the
    /// output path.
    pub fn save(&mut self, abort: AbortCheck<'_>) -> SessionResult<PathBuf> {
        let input = self.require_opened()?.to_path_buf();
        let output = output_path_for(&input, &self.output_suffix);

        let instructions = self.arrangement.remap_instructions();
        if instructions.is_empty() {
            return Err(RemuxError::NothingSelected.into());
        }

        self.remuxer.remux(&input, &output, &instructions, abort)?;

        // the new file belongs in the listing
        if let Err(e) = self.relist() {
            tracing::warn!("Refresh after save failed: {}", e);
        }
        Ok(output)
    }
}
