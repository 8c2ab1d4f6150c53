use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Endpoint URLs of the portal service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub networks_url: String,
    pub stations_url: String,
    pub channels_url: String,
    pub networks_stations_url: String,
}

impl Default for Environment {
    fn default() -> Self {
        Self::from_base("http://127.0.0.1:3000")
    }
}

impl Environment {
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            networks_url: format!("{base}/networks"),
            stations_url: format!("{base}/stations"),
            channels_url: format!("{base}/channels"),
            networks_stations_url: format!("{base}/networks-stations"),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading environment {}", path_ref.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing environment {}", path_ref.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn from_base_strips_trailing_slash() {
        let env = Environment::from_base("http://portal.example:8080/");
        assert_eq!(env.stations_url, "http://portal.example:8080/stations");
        assert_eq!(
            env.networks_stations_url,
            "http://portal.example:8080/networks-stations"
        );
    }

    #[test]
    fn load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"networks_url: http://a/n\nstations_url: http://a/s\nchannels_url: http://a/c\nnetworks_stations_url: http://a/ns\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let env = Environment::load(&path).unwrap();
        assert_eq!(env.channels_url, "http://a/c");
    }
}
