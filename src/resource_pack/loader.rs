//! Resource pack loading from ZIP files and directories.

use super::ResourcePack;
use crate::error::{ExporterError, Result};
use std::io::Read;
use std::path::Path;

/// Load a resource pack from a file path.
///
/// Supports both ZIP files and directories.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ResourcePack> {
    let path = path.as_ref();

    if path.is_dir() {
        load_from_directory(path)
    } else {
        let data = std::fs::read(path)?;
        load_from_bytes(&data)
    }
}

/// Load a resource pack from bytes (ZIP data).
pub fn load_from_bytes(data: &[u8]) -> Result<ResourcePack> {
    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut pack = ResourcePack::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let file_path = file.name().to_string();

        if let Some((namespace, asset_type, asset_path)) = parse_asset_path(&file_path) {
            match classify(asset_type, asset_path) {
                Some(AssetKind::Model(model_path)) => {
                    let mut contents = String::new();
                    file.read_to_string(&mut contents)?;
                    pack.add_model_json(&qualify(namespace, model_path), contents);
                }
                Some(AssetKind::TextureMeta(texture_path)) => {
                    let mut contents = String::new();
                    file.read_to_string(&mut contents)?;
                    pack.add_texture_meta(&qualify(namespace, texture_path), contents);
                }
                Some(AssetKind::Texture(texture_path)) => {
                    let mut data = Vec::new();
                    file.read_to_end(&mut data)?;
                    pack.add_texture(&qualify(namespace, texture_path), data);
                }
                None => {}
            }
        }
    }

    tracing::debug!(
        "Loaded {} models and {} textures from archive",
        pack.model_count(),
        pack.texture_count()
    );

    Ok(pack)
}

/// Load a resource pack from a directory.
fn load_from_directory(path: &Path) -> Result<ResourcePack> {
    let mut pack = ResourcePack::new();

    let assets_path = path.join("assets");
    if !assets_path.exists() {
        return Err(ExporterError::InvalidResourcePack(
            "No assets directory found".to_string(),
        ));
    }

    for namespace_entry in std::fs::read_dir(&assets_path)? {
        let namespace_entry = namespace_entry?;
        if !namespace_entry.file_type()?.is_dir() {
            continue;
        }

        let namespace = namespace_entry.file_name().to_string_lossy().to_string();
        let namespace_path = namespace_entry.path();

        for asset_type in ["models", "textures"] {
            let base = namespace_path.join(asset_type);
            if !base.exists() {
                continue;
            }
            visit_files(&base, &base, &mut |relative, file_path| {
                match classify(asset_type, relative) {
                    Some(AssetKind::Model(model_path)) => {
                        let contents = std::fs::read_to_string(file_path)?;
                        pack.add_model_json(&qualify(&namespace, model_path), contents);
                    }
                    Some(AssetKind::TextureMeta(texture_path)) => {
                        let contents = std::fs::read_to_string(file_path)?;
                        pack.add_texture_meta(&qualify(&namespace, texture_path), contents);
                    }
                    Some(AssetKind::Texture(texture_path)) => {
                        let data = std::fs::read(file_path)?;
                        pack.add_texture(&qualify(&namespace, texture_path), data);
                    }
                    None => {}
                }
                Ok(())
            })?;
        }
    }

    tracing::debug!(
        "Loaded {} models and {} textures from {:?}",
        pack.model_count(),
        pack.texture_count(),
        path
    );

    Ok(pack)
}

enum AssetKind<'a> {
    Model(&'a str),
    Texture(&'a str),
    TextureMeta(&'a str),
}

/// Decide what an asset file is from its type folder and relative path.
fn classify<'a>(asset_type: &str, asset_path: &'a str) -> Option<AssetKind<'a>> {
    match asset_type {
        "models" => asset_path.strip_suffix(".json").map(AssetKind::Model),
        "textures" => {
            if let Some(texture_path) = asset_path.strip_suffix(".png.mcmeta") {
                Some(AssetKind::TextureMeta(texture_path))
            } else {
                asset_path.strip_suffix(".png").map(AssetKind::Texture)
            }
        }
        _ => None,
    }
}

/// Prefix non-default namespaces onto an asset path.
fn qualify(namespace: &str, asset_path: &str) -> String {
    if namespace == "minecraft" {
        asset_path.to_string()
    } else {
        format!("{}:{}", namespace, asset_path)
    }
}

/// Parse an asset path from a ZIP file.
/// Returns (namespace, asset_type, asset_path) if valid.
fn parse_asset_path(file_path: &str) -> Option<(&str, &str, &str)> {
    // Expected format: assets/{namespace}/{type}/{path}
    let parts: Vec<&str> = file_path.splitn(4, '/').collect();

    if parts.len() >= 4 && parts[0] == "assets" {
        Some((parts[1], parts[2], parts[3]))
    } else {
        None
    }
}

/// Walk a directory tree, passing each file's `/`-separated path relative to `base`.
fn visit_files<F>(base: &Path, dir: &Path, handler: &mut F) -> Result<()>
where
    F: FnMut(&str, &Path) -> Result<()>,
{
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            visit_files(base, &path, handler)?;
        } else if let Ok(relative) = path.strip_prefix(base) {
            let relative = relative.to_string_lossy().replace('\\', "/");
            handler(&relative, &path)?;
        }
    }
    Ok(())
}
