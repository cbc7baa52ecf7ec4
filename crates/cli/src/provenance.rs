use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact: the subcommand and its resolved parameters.
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self { command, params }
    }
}

#[derive(Serialize)]
struct Sidecar<'a> {
    tool: &'static str,
    version: &'static str,
    code_rev: String,
    command: &'a str,
    params: &'a Value,
    outputs: Vec<String>,
}

/// Write `<artifact>.provenance.json` with the tool version, git commit,
/// command, params and outputs.
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: &Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let provenance_path = provenance_path(artifact);
    if let Some(parent) = provenance_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let doc = Sidecar {
        tool: env!("CARGO_PKG_NAME"),
        version: triangulator::VERSION,
        code_rev: current_git_rev(),
        command: payload.command,
        params: &payload.params,
        outputs: vec![artifact.to_string_lossy().into_owned()],
    };
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    Ok(provenance_path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

pub fn current_git_rev() -> String {
    if let Some(from_env) = option_env!("GIT_COMMIT").filter(|s| !s.is_empty()) {
        return from_env.to_string();
    }
    if let Ok(env_override) = std::env::var("GIT_COMMIT") {
        if !env_override.is_empty() {
            return env_override;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn provenance_path_replaces_extension() {
        let derived = provenance_path(Path::new("/tmp/out/mesh.bin"));
        assert_eq!(derived, Path::new("/tmp/out/mesh.provenance.json"));
    }

    #[test]
    fn write_sidecar_records_command_and_output() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("tris.bin");
        fs::write(&artifact, [0u8, 0, 0, 0]).unwrap();
        let payload = Payload::new("triangulate", json!({"eps": 1e-9, "points": 0}));
        let prov_path = write_sidecar(&artifact, &payload).unwrap();
        assert_eq!(prov_path, dir.path().join("tris.provenance.json"));
        let parsed: Value = serde_json::from_slice(&fs::read(prov_path).unwrap()).unwrap();
        assert_eq!(parsed["command"], "triangulate");
        assert_eq!(parsed["params"]["points"], 0);
        assert_eq!(parsed["version"], triangulator::VERSION);
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
    }
}
