/// Name of the environment variable containing the path to the session configuration file.
/// If not set, defaults to
///  (1) on Linux and macOS: `$XDG_CONFIG_HOME/ndcore/config.toml` or `$HOME/.config/ndcore/config.toml`
///  (2) on Windows: `%APPDATA%\ndcore\config.toml`
pub const ENV_CONFIG_PATH: &str = "NDCORE_CONFIG_PATH";

/// Store key prefix for unlocked laws (`"law <name>"`).
pub const LAW_KEY_PREFIX: &str = "law ";

/// Store key prefix for the shortest known proof length (`"lines <exercise>"`).
pub const LINES_KEY_PREFIX: &str = "lines ";

/// Store key prefix for the text of the shortest known proof (`"proof <exercise>"`).
pub const PROOF_KEY_PREFIX: &str = "proof ";

/// Stored value of an exercise that has been activated.
pub const EXERCISE_UNLOCKED: &str = "unlocked";

/// Stored value of an exercise that has been solved.
pub const EXERCISE_SOLVED: &str = "solved";

/// Unlock text of a law proved as an exercise.
pub const LAW_PROVED: &str = "PROVED";

/// Unlock text of a law granted when an exercise is attempted.
pub const LAW_GRANTED: &str = "UNLOCKED";

/// Store key remembering that the TRUE and FALSE formulas were revealed.
pub const TRUE_FALSE_KEY: &str = "true false";
