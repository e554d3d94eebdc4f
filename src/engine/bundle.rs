//! Built game bundles (`.e4k`): a project frozen for the player.
//!
//! File format:
//! - Magic (8 bytes, LE `u64`)
//! - Format version (4 bytes, LE `u32`)
//! - Payload length (4 bytes, LE `u32`)
//! - bincode payload (variable length)
//! - SHA256 checksum of everything above (32 bytes)

use crate::core::constants::{BUNDLE_MAGIC, BUNDLE_VERSION};
use crate::core::{EngineError, Result};
use crate::project::ProjectData;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

const HEADER_LEN: usize = 8 + 4 + 4;
const CHECKSUM_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameBundle {
    pub project: ProjectData,
    /// Frame the player starts in; the first frame when `None`
    pub start_frame: Option<String>,
    /// RFC 3339 build timestamp
    pub built_at: String,
}

impl GameBundle {
    pub fn new(project: ProjectData, start_frame: Option<String>) -> Self {
        Self {
            project,
            start_frame,
            built_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let data = bincode::serialize(self)?;
        let data_len = u32::try_from(data.len())
            .map_err(|_| EngineError::CorruptBundle("project too large".into()))?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + data.len() + CHECKSUM_LEN);
        bytes.extend_from_slice(&BUNDLE_MAGIC.to_le_bytes());
        bytes.extend_from_slice(&BUNDLE_VERSION.to_le_bytes());
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.extend_from_slice(&data);

        let checksum = Sha256::digest(&bytes);
        bytes.extend_from_slice(&checksum);
        Ok(bytes)
    }

    /// Decode and verify a bundle.
    ///
    /// Fails on wrong magic, unsupported version, truncation, trailing bytes
    /// or checksum mismatch.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN + CHECKSUM_LEN {
            return Err(EngineError::CorruptBundle("file is truncated".into()));
        }

        let magic = u64::from_le_bytes(read_array(bytes, 0));
        if magic != BUNDLE_MAGIC {
            return Err(EngineError::CorruptBundle(format!(
                "bad magic: expected 0x{:016X}, got 0x{:016X}",
                BUNDLE_MAGIC, magic
            )));
        }

        let version = u32::from_le_bytes(read_array(bytes, 8));
        if version != BUNDLE_VERSION {
            return Err(EngineError::CorruptBundle(format!(
                "unsupported version {} (expected {})",
                version, BUNDLE_VERSION
            )));
        }

        let data_len = u32::from_le_bytes(read_array(bytes, 12)) as usize;
        let body_end = HEADER_LEN + data_len;
        if bytes.len() != body_end + CHECKSUM_LEN {
            return Err(EngineError::CorruptBundle(format!(
                "length mismatch: header says {} payload bytes, file has {}",
                data_len,
                bytes.len().saturating_sub(HEADER_LEN + CHECKSUM_LEN)
            )));
        }

        let computed = Sha256::digest(&bytes[..body_end]);
        if computed.as_slice() != &bytes[body_end..] {
            return Err(EngineError::CorruptBundle(
                "checksum verification failed".into(),
            ));
        }

        Ok(bincode::deserialize(&bytes[HEADER_LEN..body_end])?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.encode()?)?;
        log::info!("Wrote bundle {}", path.display());
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        Self::decode(&fs::read(path)?)
    }
}

/// Bundle `project` into `path`, checking the start frame exists first.
pub fn build_bundle(project: &ProjectData, start_frame: Option<&str>, path: &Path) -> Result<GameBundle> {
    if let Some(name) = start_frame {
        if project.frame(name).is_none() {
            return Err(EngineError::UnknownFrame(name.to_string()));
        }
    }
    let bundle = GameBundle::new(project.clone(), start_frame.map(str::to_string));
    bundle.write(path)?;
    Ok(bundle)
}

pub fn load_bundle(path: &Path) -> Result<GameBundle> {
    GameBundle::read(path)
}

fn read_array<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[offset..offset + N]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{ClauseData, EventData, ObjectData};

    fn sample() -> GameBundle {
        let mut project = ProjectData::starter();
        project.frames[1]
            .objects
            .push(ObjectData::new("CounterObject", "Score", 10.0, 10.0));
        project.frames[1].events.push(EventData::new(
            vec![ClauseData::new("KeyPressed").with("key", "K_SPACE")],
            vec![ClauseData::new("AddToCounter")
                .with("counter_name", "Score")
                .with("value", "1")],
        ));
        GameBundle::new(project, Some("Level1".into()))
    }

    #[test]
    fn test_encode_decode() {
        let bundle = sample();
        let bytes = bundle.encode().unwrap();
        assert_eq!(&bytes[..8], &BUNDLE_MAGIC.to_le_bytes());
        assert_eq!(GameBundle::decode(&bytes).unwrap(), bundle);
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let mut bytes = sample().encode().unwrap();
        let middle = HEADER_LEN + 4;
        bytes[middle] ^= 0xFF;
        let err = GameBundle::decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("checksum"));
    }

    #[test]
    fn test_bad_magic_and_version_rejected() {
        let mut bytes = sample().encode().unwrap();
        bytes[0] ^= 1;
        assert!(GameBundle::decode(&bytes)
            .unwrap_err()
            .to_string()
            .contains("magic"));

        let mut bytes = sample().encode().unwrap();
        bytes[8] = 99;
        assert!(GameBundle::decode(&bytes)
            .unwrap_err()
            .to_string()
            .contains("version"));
    }

    #[test]
    fn test_truncated_rejected() {
        let bytes = sample().encode().unwrap();
        assert!(GameBundle::decode(&bytes[..10]).is_err());
        assert!(GameBundle::decode(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn test_build_bundle_checks_start_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.e4k");
        let project = ProjectData::starter();
        assert!(matches!(
            build_bundle(&project, Some("Credits"), &path),
            Err(EngineError::UnknownFrame(_))
        ));
        assert!(!path.exists());

        build_bundle(&project, Some("Menu"), &path).unwrap();
        let loaded = load_bundle(&path).unwrap();
        assert_eq!(loaded.start_frame.as_deref(), Some("Menu"));
        assert_eq!(loaded.project, project);
    }
}
