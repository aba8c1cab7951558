//! crates/logging/src/config.rs
//! Verbosity configuration combining info and debug levels.

use super::levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};

/// Combined verbosity configuration for info and debug flags.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    /// Info flag levels.
    pub info: InfoLevels,
    /// Debug flag levels.
    pub debug: DebugLevels,
}

impl VerbosityConfig {
    /// Create a new configuration from a verbose level (0-4).
    ///
    /// Level 1 reports copies and deletions, level 2 adds skipped entries and
    /// the external command line, level 3 adds walk and guard internals, and
    /// level 4 and above enables everything.
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self::default();

        config.info.nonreg = 1;
        if level == 0 {
            return config;
        }

        config.info.copy = 1;
        config.info.del = 1;
        config.info.progress = 1;
        config.info.stats = 1;

        if level >= 2 {
            config.info.skip = 1;
            config.debug.cmd = 1;
            config.debug.exec = 1;
        }

        if level >= 3 {
            config.info.skip = 2;
            config.debug.del = 1;
            config.debug.exclude = 1;
            config.debug.flist = 1;
            config.debug.guard = 1;
            config.debug.time = 1;
        }

        if level >= 4 {
            config.info.set_all(2);
            config.debug.set_all(2);
            config.debug.flist = 3;
        }

        config
    }

    /// Apply a single info flag token (e.g., "copy2", "del").
    pub fn apply_info_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;

        if name == "all" {
            self.info.set_all(level);
            return Ok(());
        }

        let flag = InfoFlag::ALL
            .into_iter()
            .find(|flag| flag.name() == name)
            .ok_or_else(|| format!("unknown info flag: {name}"))?;

        self.info.set(flag, level);
        Ok(())
    }

    /// Apply a single debug flag token (e.g., "cmd2", "flist").
    pub fn apply_debug_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;

        if name == "all" {
            self.debug.set_all(level);
            return Ok(());
        }

        let flag = DebugFlag::ALL
            .into_iter()
            .find(|flag| flag.name() == name)
            .ok_or_else(|| format!("unknown debug flag: {name}"))?;

        self.debug.set(flag, level);
        Ok(())
    }

    /// Apply a comma-separated list of info tokens.
    pub fn apply_info_list(&mut self, list: &str) -> Result<(), String> {
        list.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .try_for_each(|token| self.apply_info_flag(token))
    }

    /// Apply a comma-separated list of debug tokens.
    pub fn apply_debug_list(&mut self, list: &str) -> Result<(), String> {
        list.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .try_for_each(|token| self.apply_debug_flag(token))
    }
}

/// Parse a flag token like "copy2" into ("copy", 2) or "del" into ("del", 1).
fn parse_flag_token(token: &str) -> Result<(&str, u8), String> {
    if token.is_empty() {
        return Err("empty flag token".to_string());
    }

    let digit_start = token.find(|c: char| c.is_ascii_digit());

    match digit_start {
        Some(0) => Err(format!("flag token has no name: {token}")),
        Some(pos) => {
            let name = &token[..pos];
            let level = token[pos..]
                .parse::<u8>()
                .map_err(|_| format!("invalid level in flag: {token}"))?;
            Ok((name, level))
        }
        None => Ok((token, 1)),
    }
}
