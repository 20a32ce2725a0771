#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// UECda protocol version this build speaks (§6).
pub const PROTOCOL_VERSION: u32 = 20070;

const DEFAULT_PORT: u16 = 42485;
const DEFAULT_NUM_GAMES: u32 = 1;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;
const DEFAULT_ELEVEN_BACK_ENABLED: bool = false;
const DEFAULT_FIVE_SKIP_ENABLED: bool = false;
const DEFAULT_SIX_REVERSE_ENABLED: bool = false;
const DEFAULT_SEAT_CHANGE_ENABLED: bool = false;

/// Everything the session coordinator needs to run one session of games. Parsing this out of
/// a config file or CLI flags is the host program's job (§1); this crate only consumes the
/// resulting struct.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub port: u16,
    pub num_games: u32,
    pub read_timeout_secs: u64,
    pub eleven_back_enabled: bool,
    pub five_skip_enabled: bool,
    pub six_reverse_enabled: bool,
    pub seat_change_enabled: bool,
    /// Fixes the deal/shuffle PRNG for reproducible sessions. `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Basic sanity checks a host should run before starting a session.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_games == 0 {
            return Err("num_games must be at least 1".to_string());
        }
        if self.read_timeout_secs == 0 {
            return Err("read_timeout_secs must be nonzero".to_string());
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            num_games: DEFAULT_NUM_GAMES,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            eleven_back_enabled: DEFAULT_ELEVEN_BACK_ENABLED,
            five_skip_enabled: DEFAULT_FIVE_SKIP_ENABLED,
            six_reverse_enabled: DEFAULT_SIX_REVERSE_ENABLED,
            seat_change_enabled: DEFAULT_SEAT_CHANGE_ENABLED,
            rng_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_games_rejected() {
        let mut config = SessionConfig::default();
        config.num_games = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_optional_rules_default_off() {
        let config = SessionConfig::default();
        assert!(!config.eleven_back_enabled);
        assert!(!config.five_skip_enabled);
        assert!(!config.six_reverse_enabled);
        assert!(!config.seat_change_enabled);
    }
}
