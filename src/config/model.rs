// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [workspace]
/// members = ["packages/*"]
///
/// [watcher]
/// include = ["**/*.rs"]
/// ignore = ["**/target/**"]
///
/// [action]
/// run_scripts = ["cargo", "check"]
///
/// [debounce]
/// quiet_ms = 2000
/// max_wait_ms = 3000
/// ```
///
/// All sections are optional and have reasonable defaults, except that
/// `[action].run_scripts` must end up non-empty (possibly via `--run`)
/// before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Workspace package discovery from `[workspace]`.
    #[serde(default)]
    pub workspace: WorkspaceSection,

    /// Watch session options from `[watcher]`.
    #[serde(default)]
    pub watcher: WatcherSection,

    /// Action configuration from `[action]`.
    #[serde(default)]
    pub action: ActionSection,

    /// Debounce timings from `[debounce]`.
    #[serde(default)]
    pub debounce: DebounceSection,
}

/// `[workspace]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceSection {
    /// Globs (relative to the project root) naming package directories,
    /// e.g. `["packages/*", "tools/*"]`.
    #[serde(default = "default_members")]
    pub members: Vec<String>,
}

fn default_members() -> Vec<String> {
    vec!["packages/*".to_string()]
}

impl Default for WorkspaceSection {
    fn default() -> Self {
        Self {
            members: default_members(),
        }
    }
}

/// `[watcher]` section.
///
/// Initial-scan suppression is not configurable: the watcher never reports
/// pre-existing files as events.
#[derive(Debug, Clone, Deserialize)]
pub struct WatcherSection {
    /// Include globs, relative to the project root.
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Ignore globs; a path matching any of these never produces an event.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Optional poll interval in milliseconds, passed through to the
    /// underlying watcher backend. `None` keeps the platform default.
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
}

fn default_include() -> Vec<String> {
    vec!["**/*".to_string()]
}

impl Default for WatcherSection {
    fn default() -> Self {
        Self {
            include: default_include(),
            ignore: Vec::new(),
            poll_interval_ms: None,
        }
    }
}

/// `[action]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionSection {
    /// Command list spawned in the owning package directory when no callback
    /// is registered for a change event: `[executable, ...args]`.
    #[serde(default)]
    pub run_scripts: Vec<String>,

    /// Discard all three standard streams of the spawned command.
    #[serde(default)]
    pub silent: bool,

    /// Set color-forcing environment variables on the child process.
    ///
    /// The parent's own environment is never mutated.
    #[serde(default = "default_force_color")]
    pub force_color: bool,

    /// Clear the terminal before each "action performed" report.
    #[serde(default)]
    pub clear_screen: bool,
}

fn default_force_color() -> bool {
    true
}

impl Default for ActionSection {
    fn default() -> Self {
        Self {
            run_scripts: Vec::new(),
            silent: false,
            force_color: default_force_color(),
            clear_screen: false,
        }
    }
}

/// `[debounce]` section.
///
/// A burst of change events is collapsed into a single firing once the
/// stream has been quiet for `quiet_ms`; `max_wait_ms` bounds how long a
/// continuous burst can delay the firing.
#[derive(Debug, Clone, Deserialize)]
pub struct DebounceSection {
    #[serde(default = "default_quiet_ms")]
    pub quiet_ms: u64,

    #[serde(default = "default_max_wait_ms")]
    pub max_wait_ms: u64,

    /// Also fire immediately on the first event of a new burst.
    #[serde(default)]
    pub leading: bool,
}

fn default_quiet_ms() -> u64 {
    2000
}

fn default_max_wait_ms() -> u64 {
    3000
}

impl Default for DebounceSection {
    fn default() -> Self {
        Self {
            quiet_ms: default_quiet_ms(),
            max_wait_ms: default_max_wait_ms(),
            leading: false,
        }
    }
}
