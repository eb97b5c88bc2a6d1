use std::fs::{self, File};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::error::RecordError;
use crate::models::media::MediaType;
use crate::models::recording_result::RecordingMetadata;

/// Import a finalized artifact into a library directory.
///
/// Copies the file under a timestamped name, computes its SHA-256 checksum,
/// writes a metadata sidecar next to it, and deletes the temp original. The
/// coordinator's responsibility ends at handing over the finalized location;
/// this is the storage layer that takes it from there.
pub fn import_artifact(
    artifact: &Path,
    library_dir: &Path,
    tracks: Vec<MediaType>,
) -> Result<RecordingMetadata, RecordError> {
    fs::create_dir_all(library_dir)
        .map_err(|e| RecordError::Storage(format!("failed to create library dir: {}", e)))?;

    let extension = artifact
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("muxr");
    let stamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S");
    let destination: PathBuf = library_dir.join(format!("output_{}.{}", stamp, extension));

    fs::copy(artifact, &destination)
        .map_err(|e| RecordError::Storage(format!("failed to copy artifact: {}", e)))?;

    let checksum = sha256_file(&destination)?;
    let meta = RecordingMetadata::new(&destination.to_string_lossy(), &checksum, tracks);
    write_sidecar(&meta, &destination)?;

    if let Err(e) = fs::remove_file(artifact) {
        log::warn!("failed to remove temp artifact {}: {}", artifact.display(), e);
    }

    log::info!("imported recording to {}", destination.display());
    Ok(meta)
}

/// Compute SHA-256 hex digest of a file.
pub fn sha256_file(path: &Path) -> Result<String, RecordError> {
    let data = fs::read(path)
        .map_err(|e| RecordError::Storage(format!("failed to read file for checksum: {}", e)))?;
    let digest = Sha256::digest(&data);
    Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
}

/// The sidecar lives next to the artifact, sharing its stem.
fn sidecar_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("metadata.json")
}

/// Write the metadata sidecar for an imported artifact.
pub fn write_sidecar(meta: &RecordingMetadata, artifact: &Path) -> Result<(), RecordError> {
    let path = sidecar_path(artifact);
    let file = File::create(&path)
        .map_err(|e| RecordError::Storage(format!("failed to create sidecar: {}", e)))?;
    serde_json::to_writer_pretty(file, meta)
        .map_err(|e| RecordError::Storage(format!("failed to write sidecar: {}", e)))
}

/// Read back the metadata sidecar of an imported artifact.
pub fn read_sidecar(artifact: &Path) -> Result<RecordingMetadata, RecordError> {
    let path = sidecar_path(artifact);
    let file = File::open(&path)
        .map_err(|e| RecordError::Storage(format!("failed to open sidecar: {}", e)))?;
    serde_json::from_reader(file)
        .map_err(|e| RecordError::Storage(format!("failed to parse sidecar: {}", e)))
}
