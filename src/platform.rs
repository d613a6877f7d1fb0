//! Platform glue: the vertical-blank counter and the default directory layout.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Name of the main configuration file under the user directory.
pub const MAIN_CONFIG_FILE: &str = "retroarch.cfg";

/// Frames elapsed since boot, advanced by the vertical-blank interrupt.
///
/// The interrupt handler is the only writer; any thread may read.
#[derive(Debug, Default)]
pub struct VBlankCounter(AtomicU64);

impl VBlankCounter {
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Called from the vertical-blank handler.
    pub fn on_vblank(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Vertical blanks seen so far.
    pub fn frames(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Default directories, derived from the working directory at boot.
///
/// Cores and core info live next to the executable; everything the user produces lives under
/// `<cwd>/retroarch`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultDirs {
    pub port: PathBuf,
    pub cores: PathBuf,
    pub core_info: PathBuf,
    pub assets: PathBuf,
    pub database: PathBuf,
    pub cheats: PathBuf,
    pub menu_config: PathBuf,
    pub core_assets: PathBuf,
    pub playlists: PathBuf,
    pub remaps: PathBuf,
    pub savefiles: PathBuf,
    pub savestates: PathBuf,
    pub system: PathBuf,
    pub cache: PathBuf,
    pub overlays: PathBuf,
    pub thumbnails: PathBuf,
    pub logs: PathBuf,
    pub content_history: PathBuf,
    pub main_config: PathBuf,
}

impl DefaultDirs {
    pub fn from_base(cwd: &Path) -> Self {
        let user = cwd.join("retroarch");
        let menu_config = user.join("config");
        Self {
            port: cwd.parent().unwrap_or(cwd).to_path_buf(),
            cores: cwd.join("cores"),
            core_info: cwd.join("info"),
            assets: user.join("assets"),
            database: user.join("database").join("rdb"),
            cheats: user.join("cheats"),
            remaps: menu_config.join("remaps"),
            menu_config,
            core_assets: user.join("downloads"),
            playlists: user.join("playlists"),
            savefiles: user.join("savefiles"),
            savestates: user.join("savestates"),
            system: user.join("system"),
            cache: user.join("temp"),
            overlays: user.join("overlays"),
            thumbnails: user.join("thumbnails"),
            logs: user.join("logs"),
            main_config: user.join(MAIN_CONFIG_FILE),
            content_history: user,
        }
    }

    /// Every directory, for creating the tree up front. The main config file is not included.
    pub fn dirs(&self) -> [&Path; 18] {
        [
            &self.port,
            &self.cores,
            &self.core_info,
            &self.assets,
            &self.database,
            &self.cheats,
            &self.menu_config,
            &self.core_assets,
            &self.playlists,
            &self.remaps,
            &self.savefiles,
            &self.savestates,
            &self.system,
            &self.cache,
            &self.overlays,
            &self.thumbnails,
            &self.logs,
            &self.content_history,
        ]
    }
}

/// Device and partition parts of a boot path such as `hdd0:__common:pfs:/retroarch/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountInfo {
    /// Device and partition, e.g. `hdd0:__common`.
    pub mount_point: String,
    /// Filesystem prefix, e.g. `pfs:`.
    pub mount_string: String,
    /// Working directory on the mounted filesystem, e.g. `pfs:/retroarch/`.
    pub cwd: String,
}

impl MountInfo {
    /// Split a boot path on `:`. Needs at least three non-empty parts.
    pub fn parse(path: &str) -> Option<Self> {
        let parts: Vec<&str> = path.split(':').filter(|p| !p.is_empty()).collect();
        if parts.len() < 3 {
            return None;
        }
        let mount_string = format!("{}:", parts[2]);
        let cwd = match parts.get(3) {
            Some(rest) if parts.len() == 4 => format!("{mount_string}{rest}"),
            _ => mount_string.clone(),
        };
        Some(Self {
            mount_point: format!("{}:{}", parts[0], parts[1]),
            mount_string,
            cwd,
        })
    }
}
