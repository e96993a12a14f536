/*
 * Decides at start-up whether the engine can run from the private data root or
 * whether the game data still has to be imported. The file names below are a
 * deployment contract with the engine and must not change.
 */
use std::path::Path;

// Written by the engine once it has run; its presence skips every other check.
pub const CONFIG_MARKER_FILE_NAME: &str = "fallout.cfg";
pub const MASTER_DAT_FILE_NAME: &str = "master.dat";
pub const CRITTER_DAT_FILE_NAME: &str = "critter.dat";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    ProceedToEngine,
    NeedsImport,
}

// Snapshot of which required files exist under the data root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssetPresence {
    pub config_marker: bool,
    pub master_dat: bool,
    pub critter_dat: bool,
}

impl AssetPresence {
    pub fn probe(data_root: &Path) -> Self {
        let presence = AssetPresence {
            config_marker: data_root.join(CONFIG_MARKER_FILE_NAME).exists(),
            master_dat: data_root.join(MASTER_DAT_FILE_NAME).exists(),
            critter_dat: data_root.join(CRITTER_DAT_FILE_NAME).exists(),
        };
        log::debug!("AssetCheck: Probed {data_root:?}: {presence:?}");
        presence
    }

    pub fn decision(&self) -> Decision {
        if self.config_marker {
            return Decision::ProceedToEngine;
        }
        if !self.master_dat || !self.critter_dat {
            Decision::NeedsImport
        } else {
            Decision::ProceedToEngine
        }
    }

    // Names of the payload files that are still missing, for user-facing messages.
    pub fn missing_payloads(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.master_dat {
            missing.push(MASTER_DAT_FILE_NAME);
        }
        if !self.critter_dat {
            missing.push(CRITTER_DAT_FILE_NAME);
        }
        missing
    }
}

pub fn check_and_dispatch(data_root: &Path) -> Decision {
    let decision = AssetPresence::probe(data_root).decision();
    log::info!("AssetCheck: Decision for {data_root:?} is {decision:?}.");
    decision
}
