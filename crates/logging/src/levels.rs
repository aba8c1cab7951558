//! crates/logging/src/levels.rs
//! Flag enums and level structures for info and debug verbosity.

/// Info flags for user-facing diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfoFlag {
    /// Entries copied into the destination.
    Copy,
    /// Extraneous destination entries removed.
    Del,
    /// Symlinks and other non-regular entries.
    Nonreg,
    /// Output forwarded from the external mirroring tool.
    Progress,
    /// Entries skipped by exclusions or nesting rules.
    Skip,
    /// Per-run totals.
    Stats,
}

impl InfoFlag {
    /// All info flags in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Copy,
        Self::Del,
        Self::Nonreg,
        Self::Progress,
        Self::Skip,
        Self::Stats,
    ];

    /// Token used when parsing `--info`-style flag lists.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Del => "del",
            Self::Nonreg => "nonreg",
            Self::Progress => "progress",
            Self::Skip => "skip",
            Self::Stats => "stats",
        }
    }
}

/// Debug flags for internal diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DebugFlag {
    /// Command line assembled for the external tool.
    Cmd,
    /// Deletion pass decisions.
    Del,
    /// Exclusion normalization and matching.
    Exclude,
    /// Executable discovery and strategy selection.
    Exec,
    /// Tree walks.
    Flist,
    /// Nested source/destination analysis.
    Guard,
    /// Deadlines and timing.
    Time,
}

impl DebugFlag {
    /// All debug flags in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Cmd,
        Self::Del,
        Self::Exclude,
        Self::Exec,
        Self::Flist,
        Self::Guard,
        Self::Time,
    ];

    /// Token used when parsing `--debug`-style flag lists.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cmd => "cmd",
            Self::Del => "del",
            Self::Exclude => "exclude",
            Self::Exec => "exec",
            Self::Flist => "flist",
            Self::Guard => "guard",
            Self::Time => "time",
        }
    }
}

/// Info verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfoLevels {
    /// Copy level.
    pub copy: u8,
    /// Deletion level.
    pub del: u8,
    /// Non-regular entry level.
    pub nonreg: u8,
    /// Tool output level.
    pub progress: u8,
    /// Skipped entry level.
    pub skip: u8,
    /// Statistics level.
    pub stats: u8,
}

impl InfoLevels {
    /// Get the level for a specific flag.
    pub fn get(&self, flag: InfoFlag) -> u8 {
        match flag {
            InfoFlag::Copy => self.copy,
            InfoFlag::Del => self.del,
            InfoFlag::Nonreg => self.nonreg,
            InfoFlag::Progress => self.progress,
            InfoFlag::Skip => self.skip,
            InfoFlag::Stats => self.stats,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: InfoFlag, level: u8) {
        match flag {
            InfoFlag::Copy => self.copy = level,
            InfoFlag::Del => self.del = level,
            InfoFlag::Nonreg => self.nonreg = level,
            InfoFlag::Progress => self.progress = level,
            InfoFlag::Skip => self.skip = level,
            InfoFlag::Stats => self.stats = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        for flag in InfoFlag::ALL {
            self.set(flag, level);
        }
    }
}

/// Debug verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugLevels {
    /// Command construction level.
    pub cmd: u8,
    /// Deletion decision level.
    pub del: u8,
    /// Exclusion level.
    pub exclude: u8,
    /// Executable discovery level.
    pub exec: u8,
    /// Walk level.
    pub flist: u8,
    /// Nesting guard level.
    pub guard: u8,
    /// Timing level.
    pub time: u8,
}

impl DebugLevels {
    /// Get the level for a specific flag.
    pub fn get(&self, flag: DebugFlag) -> u8 {
        match flag {
            DebugFlag::Cmd => self.cmd,
            DebugFlag::Del => self.del,
            DebugFlag::Exclude => self.exclude,
            DebugFlag::Exec => self.exec,
            DebugFlag::Flist => self.flist,
            DebugFlag::Guard => self.guard,
            DebugFlag::Time => self.time,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: DebugFlag, level: u8) {
        match flag {
            DebugFlag::Cmd => self.cmd = level,
            DebugFlag::Del => self.del = level,
            DebugFlag::Exclude => self.exclude = level,
            DebugFlag::Exec => self.exec = level,
            DebugFlag::Flist => self.flist = level,
            DebugFlag::Guard => self.guard = level,
            DebugFlag::Time => self.time = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        for flag in DebugFlag::ALL {
            self.set(flag, level);
        }
    }
}
