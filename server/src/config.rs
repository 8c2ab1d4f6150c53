use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub db_name: String,
    /// Directory for file snapshots; in-memory partitions when absent.
    pub snapshot_dir: Option<PathBuf>,
    pub autosave_secs: u64,
    pub seed: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            db_name: "epb-db.json".into(),
            snapshot_dir: None,
            autosave_secs: 60,
            seed: None,
        }
    }
}

impl ServerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading server config {}", path_ref.display()))?;
        let config: ServerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing server config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_load_reads_yaml_with_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"bind: 0.0.0.0:8080\nautosave_secs: 5\nsnapshot_dir: /var/lib/portal\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = ServerConfig::load(&path).unwrap();
        assert_eq!(cfg.bind.port(), 8080);
        assert_eq!(cfg.autosave_interval(), Duration::from_secs(5));
        assert_eq!(cfg.db_name, "epb-db.json");
        assert_eq!(cfg.snapshot_dir, Some(PathBuf::from("/var/lib/portal")));
    }

    #[test]
    fn zero_autosave_is_clamped() {
        let cfg = ServerConfig {
            autosave_secs: 0,
            ..Default::default()
        };
        assert_eq!(cfg.autosave_interval(), Duration::from_secs(1));
    }
}
