//! Save/load of a game to a string-keyed store
//!
//! Persistence never aborts play: failed saves are logged and dropped,
//! failed loads report `false` and leave the state untouched. A payload
//! that parses but is missing or mangling some fields is restored field
//! by field, falling back to fresh-game defaults.

use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::types::{ActionId, DisruptionKind, Phase, RoundId};
use crate::state::simulation::{HistoryEntry, Penalties, SimulationState, TaskPool};

/// Slot the game is saved under unless the driver picks another
pub const DEFAULT_SAVE_SLOT: &str = "gtd_game_state";

/// External string-keyed store
pub trait SaveStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-process store, used by tests and the headless runner
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SaveStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SaveStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Persisted subset of the state
#[derive(Serialize)]
struct SaveData<'a> {
    current_day: u32,
    current_round: u32,
    current_round_id: RoundId,
    phase: Phase,
    energy: u32,
    daily_energy: u32,
    teaching: &'a TaskPool,
    daily_teaching_completed: u32,
    admin: &'a TaskPool,
    collaborative: &'a TaskPool,
    penalties: &'a Penalties,
    disruptions: &'a [RoundId],
    selected_action: Option<ActionId>,
    action_success: bool,
    current_disruption: Option<DisruptionKind>,
    result_message: Option<&'a str>,
    disruption_message: Option<&'a str>,
    action_history: &'a [HistoryEntry],
}

impl<'a> From<&'a SimulationState> for SaveData<'a> {
    fn from(state: &'a SimulationState) -> Self {
        Self {
            current_day: state.current_day,
            current_round: state.current_round,
            current_round_id: state.current_round_id,
            phase: state.phase,
            energy: state.energy,
            daily_energy: state.daily_energy,
            teaching: &state.teaching,
            daily_teaching_completed: state.daily_teaching_completed,
            admin: &state.admin,
            collaborative: &state.collaborative,
            penalties: &state.penalties,
            disruptions: &state.disruptions,
            selected_action: state.selected_action,
            action_success: state.action_success,
            current_disruption: state.current_disruption,
            result_message: state.result_message.as_deref(),
            disruption_message: state.disruption_message.as_deref(),
            action_history: &state.action_history,
        }
    }
}

fn field<T: DeserializeOwned>(fields: &Map<String, Value>, key: &str) -> Option<T> {
    let value = fields.get(key)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::debug!("Ignoring malformed saved field '{}': {}", key, e);
            None
        }
    }
}

impl SimulationState {
    pub fn to_save_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&SaveData::from(self))?)
    }

    /// Write the state to `slot`; failures are logged, never returned
    pub fn save(&self, store: &mut dyn SaveStore, slot: &str) {
        let outcome = self
            .to_save_json()
            .and_then(|json| store.set(slot, &json));
        if let Err(e) = outcome {
            tracing::warn!("Failed to save game state: {}", e);
        }
    }

    /// Restore the state from `slot`
    ///
    /// Returns `false` and leaves `self` untouched when nothing usable is
    /// stored.
    pub fn load<R: Rng + ?Sized>(
        &mut self,
        store: &dyn SaveStore,
        slot: &str,
        config: &GameConfig,
        rng: &mut R,
    ) -> bool {
        let raw = match store.get(slot) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!("Failed to load game state: {}", e);
                return false;
            }
        };

        let data: Value = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Failed to load game state: {}", e);
                return false;
            }
        };
        let Some(fields) = data.as_object() else {
            tracing::warn!("Failed to load game state: saved data is not an object");
            return false;
        };

        let mut loaded = SimulationState::new(config, rng);
        if let Some(v) = field(fields, "current_day") {
            loaded.current_day = v;
        }
        if let Some(v) = field(fields, "current_round") {
            loaded.current_round = v;
        }
        if let Some(v) = field(fields, "current_round_id") {
            loaded.current_round_id = v;
        }
        if let Some(v) = field(fields, "phase") {
            loaded.phase = v;
        }
        if let Some(v) = field(fields, "energy") {
            loaded.energy = v;
        }
        if let Some(v) = field(fields, "daily_energy") {
            loaded.daily_energy = v;
        }
        if let Some(v) = field(fields, "teaching") {
            loaded.teaching = v;
        }
        if let Some(v) = field(fields, "daily_teaching_completed") {
            loaded.daily_teaching_completed = v;
        }
        if let Some(v) = field(fields, "admin") {
            loaded.admin = v;
        }
        if let Some(v) = field(fields, "collaborative") {
            loaded.collaborative = v;
        }
        if let Some(v) = field(fields, "penalties") {
            loaded.penalties = v;
        }
        if let Some(v) = field::<Vec<RoundId>>(fields, "disruptions") {
            let mut rounds = v;
            rounds.sort_unstable();
            rounds.dedup();
            loaded.disruptions = rounds;
        }
        if let Some(v) = field(fields, "selected_action") {
            loaded.selected_action = v;
        }
        if let Some(v) = field(fields, "action_success") {
            loaded.action_success = v;
        }
        if let Some(v) = field(fields, "current_disruption") {
            loaded.current_disruption = v;
        }
        if let Some(v) = field(fields, "result_message") {
            loaded.result_message = v;
        }
        if let Some(v) = field(fields, "disruption_message") {
            loaded.disruption_message = v;
        }
        if let Some(v) = field(fields, "action_history") {
            loaded.action_history = v;
        }

        // Day total_days + 1 is where a finished game rests
        let last_day = config.structure.total_days.saturating_add(1);
        loaded.current_day = loaded.current_day.clamp(1, last_day);
        loaded.current_round = loaded
            .current_round
            .clamp(1, config.structure.rounds_per_day.max(1));
        let derived = config
            .clock()
            .round_id(loaded.current_day, loaded.current_round);
        if loaded.current_round_id != derived {
            tracing::warn!(
                saved = loaded.current_round_id,
                derived,
                "saved round id disagrees with day/round, using day/round"
            );
            loaded.current_round_id = derived;
        }
        if loaded.current_round_id > config.structure.total_rounds {
            loaded.phase = Phase::End;
            loaded.is_game_end = true;
        }
        loaded.energy = loaded.energy.min(loaded.daily_energy);
        loaded.calculate_total_penalties();

        *self = loaded;
        true
    }

    pub fn clear_save(store: &mut dyn SaveStore, slot: &str) {
        if let Err(e) = store.remove(slot) {
            tracing::warn!("Failed to clear game state: {}", e);
        }
    }
}
