//! Game tuning and input preferences
//!
//! Persisted separately from player records: `settings.json` on native,
//! LocalStorage on the web.

use serde::{Deserialize, Serialize};

/// Every gameplay and input constant the engine reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Movement ===
    /// Largest head displacement per move (pixels)
    pub max_speed: f32,
    /// Pointer closer than this to the head does not move it
    pub dead_zone: f32,
    /// Minimum time between two head moves (seconds)
    pub move_interval: f64,
    /// Pointer target is clamped this far inside the arena edge
    pub target_margin: f32,

    // === Body ===
    /// Nodes in a fresh snake
    pub initial_length: usize,
    /// Distance between the nodes of a fresh snake
    pub segment_spacing: f32,
    /// Head-to-node hit distance for self-collision
    pub node_radius: f32,
    /// Head-to-segment hit distance for self-collision
    pub segment_threshold: f32,
    /// Nodes nearest the head ignored by self-collision
    pub self_collision_skip: usize,

    // === Arena ===
    /// Head closer than this to an edge is fatal
    pub boundary_inset: f32,
    /// Disk around the arena centre kept free of random obstacles
    pub safe_zone_radius: f32,
    /// Placement attempts per random obstacle before it is skipped
    pub obstacle_attempts: u32,

    // === Food & scoring ===
    /// Head within this distance of the food eats it
    pub eat_radius: f32,
    /// Food is never placed closer than this to a snake node
    pub food_clearance: f32,
    /// Placement attempts before food falls back to a fixed spot
    pub food_attempts: u32,
    pub base_score: u64,
    pub level_bonus_factor: u64,
    pub max_level: u32,

    // === Revive ===
    pub max_revives: u8,

    // === Activation ===
    /// Index-to-thumb distance that counts as a pinch
    pub pinch_threshold: f32,
    /// Minimum time between two activations (seconds)
    pub activation_cooldown: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_speed: 8.0,
            dead_zone: 3.0,
            move_interval: 0.05,
            target_margin: 20.0,

            initial_length: 3,
            segment_spacing: 20.0,
            node_radius: 12.0,
            segment_threshold: 8.0,
            self_collision_skip: 3,

            boundary_inset: 5.0,
            safe_zone_radius: 80.0,
            obstacle_attempts: 30,

            eat_radius: 25.0,
            food_clearance: 40.0,
            food_attempts: 100,
            base_score: 10,
            level_bonus_factor: 5,
            max_level: 10,

            max_revives: 3,

            pinch_threshold: 30.0,
            activation_cooldown: 0.5,
        }
    }
}

impl Settings {
    /// Points awarded for one food item at `level`
    pub fn points_per_food(&self, level: u32) -> u64 {
        self.base_score + level as u64 * self.level_bonus_factor
    }

    /// Nudge the pinch threshold, never below 10px
    pub fn adjust_pinch_threshold(&mut self, delta: f32) {
        self.pinch_threshold = (self.pinch_threshold + delta).max(10.0);
        log::info!("Pinch threshold set to {}", self.pinch_threshold);
    }

    /// Default settings file name on native
    #[allow(dead_code)]
    const FILE_NAME: &'static str = "settings.json";

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pinch_snake_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from `settings.json` in the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(std::path::Path::new(Self::FILE_NAME))
    }

    /// Save settings to `settings.json` in the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        self.save_to(std::path::Path::new(Self::FILE_NAME));
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON; failures are logged, not returned
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Could not save settings: {}", e),
            },
            Err(e) => log::warn!("Could not encode settings: {}", e),
        }
    }
}
