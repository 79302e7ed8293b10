use log::{debug, info};

use crate::accounting::{self, StorageSummary};
use crate::catalog::Catalog;
use crate::configuration::preset::Preset;
use crate::configuration::system_segment::SystemSegment;
use crate::error::{PlannerError, Result};
use crate::layout::{self, SegmentLayout};
use crate::size::SizeValue;

pub const DEFAULT_CAPACITY_OPTIONS: [u32; 5] = [128, 256, 512, 1024, 2048];
pub const DEFAULT_CAPACITY_GB: u32 = 256;

/// Parses a custom item given as `NAME=SIZE`, e.g. `Final Cut Pro=4.5 GB`.
pub fn parse_custom_item(argument: &str) -> Result<(String, SizeValue)> {
    let position_of_equal_sign = match argument.rfind('=') {
        Some(position) => position,
        None => {
            return Err(PlannerError::InvalidItem(format!(
                "'{}' is not of the form NAME=SIZE",
                argument
            )));
        }
    };

    let name = argument[..position_of_equal_sign].trim().to_string();
    let size = argument[(position_of_equal_sign + 1)..].parse::<SizeValue>()?;

    Ok((name, size))
}

/// Storage size of the machine in GB, one of the configured options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StorageCapacity(u32);

impl StorageCapacity {
    pub fn new(size_in_gb: u32, options: &[u32]) -> Result<StorageCapacity> {
        if size_in_gb == 0 || !options.contains(&size_in_gb) {
            return Err(PlannerError::InvalidCapacity(size_in_gb as f64));
        }

        Ok(StorageCapacity(size_in_gb))
    }

    pub fn gb(&self) -> u32 {
        self.0
    }
}

/// Ordered selection of catalog ids. An id is in the selection at most once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    pub fn new() -> Selection {
        Selection { ids: Vec::new() }
    }

    pub fn from_ids<I, S>(ids: I) -> Selection
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Selection::new();
        for id in ids {
            selection.add(id);
        }

        selection
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn add<S: Into<String>>(&mut self, id: S) -> bool {
        let end = self.ids.len();
        self.insert_at(end, id)
    }

    /// Inserts the id before `index` (clamped to the end). Returns false and
    /// leaves the selection untouched when the id is already selected.
    pub fn insert_at<S: Into<String>>(&mut self, index: usize, id: S) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }

        let index = index.min(self.ids.len());
        self.ids.insert(index, id);
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|i| i == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from >= self.ids.len() {
            return false;
        }

        let id = self.ids.remove(from);
        let to = to.min(self.ids.len());
        self.ids.insert(to, id);
        true
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EditorMode {
    Browse,
    AddItem { draft_name: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum SearchOutcome {
    /// Exactly one item matched and was selected.
    Added(String),
    /// Nothing matched, the editor switched to adding a custom item.
    AddItemOpened(String),
    /// Several items match, nothing changed.
    Ambiguous(usize),
    /// The editor waits for the size of the custom item.
    AwaitingSize,
    Ignored,
}

/// Everything the user picked during a session. The caller owns it and the
/// accounting functions work on snapshots of it.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannerState {
    pub selection: Selection,
    pub capacity: StorageCapacity,
    pub preset_id: Option<String>,
    pub mode: EditorMode,
}

impl PlannerState {
    pub fn new(capacity: StorageCapacity) -> PlannerState {
        PlannerState {
            selection: Selection::new(),
            capacity,
            preset_id: None,
            mode: EditorMode::Browse,
        }
    }

    pub fn apply_preset(&mut self, preset: &Preset) {
        info!("applying preset '{}'", preset.id);
        self.selection = Selection::from_ids(preset.item_ids.iter().cloned());
        self.preset_id = Some(preset.id.clone());
    }

    pub fn add<S: Into<String>>(&mut self, id: S) -> bool {
        let added = self.selection.add(id);
        if added {
            self.preset_id = None;
        }

        added
    }

    pub fn insert_at<S: Into<String>>(&mut self, index: usize, id: S) -> bool {
        let inserted = self.selection.insert_at(index, id);
        if inserted {
            self.preset_id = None;
        }

        inserted
    }

    pub fn remove(&mut self, id: &str, catalog: &mut Catalog) -> bool {
        if !self.selection.remove(id) {
            return false;
        }

        self.preset_id = None;
        catalog.release(id);
        true
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        let moved = self.selection.move_item(from, to);
        if moved {
            self.preset_id = None;
        }

        moved
    }

    pub fn add_custom(
        &mut self,
        catalog: &mut Catalog,
        name: &str,
        size: SizeValue,
    ) -> Result<String> {
        let id = catalog.add_custom(name, size)?;
        self.add(id.clone());
        self.mode = EditorMode::Browse;

        Ok(id)
    }

    /// Handles the search box being submitted while browsing.
    pub fn submit_search(&mut self, query: &str, catalog: &Catalog) -> SearchOutcome {
        if let EditorMode::AddItem { .. } = self.mode {
            return SearchOutcome::AwaitingSize;
        }

        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::Ignored;
        }

        let matching: Vec<String> = catalog
            .available(self.selection.ids(), query, None)
            .into_iter()
            .map(|item| item.id.clone())
            .collect();
        debug!("search '{}' matches {} item(s)", query, matching.len());

        match matching.len() {
            0 => {
                self.mode = EditorMode::AddItem {
                    draft_name: query.to_string(),
                };
                SearchOutcome::AddItemOpened(query.to_string())
            }
            1 => {
                let id = matching[0].clone();
                self.add(id.clone());
                SearchOutcome::Added(id)
            }
            count => SearchOutcome::Ambiguous(count),
        }
    }

    /// Completes the custom item started by [`PlannerState::submit_search`].
    pub fn submit_new_item(&mut self, size: SizeValue, catalog: &mut Catalog) -> Result<String> {
        let name = match &self.mode {
            EditorMode::AddItem { draft_name } => draft_name.clone(),
            EditorMode::Browse => {
                return Err(PlannerError::InvalidItem(String::from(
                    "no custom software is being added",
                )));
            }
        };

        self.add_custom(catalog, &name, size)
    }

    pub fn cancel_new_item(&mut self) {
        self.mode = EditorMode::Browse;
    }

    pub fn set_capacity(&mut self, capacity: StorageCapacity) {
        self.capacity = capacity;
    }

    pub fn reset(&mut self) {
        info!("resetting selection");
        self.selection.clear();
        self.preset_id = None;
        self.mode = EditorMode::Browse;
    }

    pub fn user_size_gb(&self, catalog: &Catalog) -> f64 {
        accounting::total_size(self.selection.ids(), catalog)
    }

    pub fn summary(&self, catalog: &Catalog, system: &[SystemSegment]) -> Result<StorageSummary> {
        StorageSummary::compute(
            accounting::system_reserved_total(system),
            self.user_size_gb(catalog),
            self.capacity.gb() as f64,
        )
    }

    pub fn bar(&self, catalog: &Catalog, system: &[SystemSegment]) -> Result<Vec<SegmentLayout>> {
        let segments = layout::storage_segments(system, self.user_size_gb(catalog));
        layout::layout(self.capacity.gb() as f64, &segments)
    }
}
