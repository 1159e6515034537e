// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::helpers::*;
use anyhow::{bail, Context, Result};
use clap::Args;
use sigil_core::vfs::{ChunkIndex, ChunkLocation};
use sigil_core::{Category, SpriteManifest};
use sigil_lanes::SpriteSplitter;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Manifest file name at the root of a chunk tree.
pub const MANIFEST_FILE: &str = "Sprites.toml";

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// A master sprite, or a directory searched for `*.svg` masters.
    #[arg(long)]
    pub input: PathBuf,
    /// Category of a single master; defaults to the file stem.
    #[arg(long)]
    pub category: Option<String>,
    /// Root of the chunk tree (holds `Sprites.toml`).
    #[arg(long, default_value = "resources/sprites")]
    pub out: PathBuf,
    /// Maximum number of symbols per chunk.
    #[arg(long, default_value_t = 64)]
    pub per_chunk: usize,
    /// Split each master into this many evenly sized chunks instead.
    #[arg(long, conflicts_with = "per_chunk")]
    pub chunks: Option<usize>,
}

#[derive(Args, Debug)]
pub struct PackArgs {
    /// Root of the chunk tree (holds `Sprites.toml`).
    #[arg(long, default_value = "resources/sprites")]
    pub root: PathBuf,
    /// Destination of `data.pack` and `index.bin`.
    #[arg(long, default_value = ".dist/sprites")]
    pub out: PathBuf,
}

pub fn split(args: &SplitArgs) -> Result<()> {
    print_task_start("Splitting Sprites", SCISSORS, BLUE);

    let masters = find_masters(&args.input, args.category.as_deref())?;
    if masters.is_empty() {
        print_error("No master sprites found. Nothing to split.");
        return Ok(());
    }

    let splitter = SpriteSplitter::new(args.per_chunk)?;
    let manifest_path = args.out.join(MANIFEST_FILE);
    let mut manifest = load_manifest(&manifest_path)?;

    for (category, master_path) in masters {
        let master = fs::read_to_string(&master_path)
            .with_context(|| format!("Failed to read master '{}'", master_path.display()))?;
        let chunks = match args.chunks {
            Some(count) => SpriteSplitter::split_into(&master, count),
            None => splitter.split(&master),
        }
        .with_context(|| format!("Failed to split '{}'", master_path.display()))?;

        remove_stale_chunks(&manifest, &category, chunks.len(), &args.out)?;
        manifest = manifest.with_category(category.clone(), chunks.len());

        for (offset, chunk) in chunks.iter().enumerate() {
            let chunk_path = args.out.join(manifest.chunk_path(&category, offset + 1)?);
            if let Some(parent) = chunk_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&chunk_path, chunk)
                .with_context(|| format!("Failed to write chunk '{}'", chunk_path.display()))?;
        }

        println!(
            "{}{} {} '{}' -> {} chunks{}",
            BOLD,
            GREEN,
            CHECK,
            category,
            chunks.len(),
            RESET
        );
    }

    manifest.validate()?;
    fs::create_dir_all(&args.out)?;
    fs::write(&manifest_path, manifest.to_toml_string()?)
        .with_context(|| format!("Failed to write '{}'", manifest_path.display()))?;

    print_success(&format!("Updated '{}'", manifest_path.display()));
    Ok(())
}

pub fn pack(args: &PackArgs) -> Result<()> {
    print_task_start("Packing Sprites", PACKAGE, MAGENTA);

    let manifest_path = args.root.join(MANIFEST_FILE);
    if !manifest_path.exists() {
        bail!(
            "No '{}' found; run `cargo xtask sprites split` first",
            manifest_path.display()
        );
    }
    let manifest = load_manifest(&manifest_path)?;
    manifest.validate()?;

    fs::create_dir_all(&args.out)?;
    build_packfiles(&manifest, &args.root, &args.out)?;

    print_success("Sprite packing finished successfully.");
    Ok(())
}

/// Builds the `data.pack` and `index.bin` files from every chunk in the manifest.
fn build_packfiles(manifest: &SpriteManifest, root: &Path, dest_dir: &Path) -> Result<()> {
    let index_path = dest_dir.join("index.bin");
    let data_path = dest_dir.join("data.pack");

    let mut data_file = File::create(&data_path)
        .with_context(|| format!("Failed to create data pack at '{}'", data_path.display()))?;

    let mut locations = Vec::new();
    let mut current_offset = 0;

    println!("{}{} Packing chunk data...", BOLD, PACKAGE);

    for (category, entry) in &manifest.categories {
        for index in 1..=entry.chunks {
            let chunk_path = root.join(manifest.chunk_path(category, index)?);
            let bytes = fs::read(&chunk_path)
                .with_context(|| format!("Failed to read chunk '{}'", chunk_path.display()))?;
            let size = bytes.len() as u64;

            data_file.write_all(&bytes)?;
            locations.push(ChunkLocation {
                category: category.clone(),
                index,
                offset: current_offset,
                size,
            });
            current_offset += size;
        }
    }

    let encoded_index =
        ChunkIndex::encode(&locations).context("Failed to serialize chunk index")?;
    fs::write(&index_path, &encoded_index)
        .with_context(|| format!("Failed to write index file to '{}'", index_path.display()))?;

    println!(
        "{}{} {} Wrote {} chunk entries to '{}' ({:.2} KB){}",
        BOLD,
        GREEN,
        CHECK,
        locations.len(),
        index_path.display(),
        encoded_index.len() as f64 / 1024.0,
        RESET
    );
    println!(
        "{}{} {} Wrote chunk data to '{}' ({:.2} KB){}",
        BOLD,
        GREEN,
        CHECK,
        data_path.display(),
        current_offset as f64 / 1024.0,
        RESET
    );

    Ok(())
}

/// Loads `Sprites.toml`, or an empty manifest if it does not exist yet.
fn load_manifest(manifest_path: &Path) -> Result<SpriteManifest> {
    if !manifest_path.exists() {
        print_info(&format!(
            "No '{}' found. Starting a new manifest.",
            manifest_path.display()
        ));
        return Ok(SpriteManifest::default());
    }

    print_info(&format!(
        "Found '{}'. Loading configuration.",
        manifest_path.display()
    ));
    let text = fs::read_to_string(manifest_path).with_context(|| {
        format!(
            "Failed to read manifest file at '{}'",
            manifest_path.display()
        )
    })?;
    SpriteManifest::from_toml_str(&text)
        .with_context(|| format!("Failed to parse TOML from '{}'", manifest_path.display()))
}

/// Resolves the masters to split, with their category.
fn find_masters(input: &Path, category: Option<&str>) -> Result<Vec<(Category, PathBuf)>> {
    if input.is_file() {
        let name = match category {
            Some(name) => name.to_string(),
            None => file_stem(input)?,
        };
        return Ok(vec![(Category::new(name), input.to_path_buf())]);
    }
    if !input.is_dir() {
        bail!("Input '{}' does not exist", input.display());
    }
    if category.is_some() {
        bail!("--category only applies to a single master file");
    }

    let mut masters = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "svg") {
            masters.push((Category::new(file_stem(path)?), path.to_path_buf()));
        }
    }
    Ok(masters)
}

fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .with_context(|| format!("Cannot derive a category from '{}'", path.display()))
}

/// Deletes chunk files of `category` beyond `new_count` left by a previous split.
fn remove_stale_chunks(
    manifest: &SpriteManifest,
    category: &Category,
    new_count: usize,
    root: &Path,
) -> Result<()> {
    let old_count = manifest.chunk_count(category).unwrap_or(0);
    for index in new_count + 1..=old_count {
        let stale = root.join(manifest.chunk_path(category, index)?);
        if stale.exists() {
            fs::remove_file(&stale)
                .with_context(|| format!("Failed to remove stale chunk '{}'", stale.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn master(ids: &[&str]) -> String {
        let symbols: String = ids
            .iter()
            .map(|id| format!("<symbol id=\"{id}\"><path d=\"M0 0\"/></symbol>"))
            .collect();
        format!("<svg xmlns=\"http://www.w3.org/2000/svg\">{symbols}</svg>")
    }

    #[test]
    fn split_then_pack_round_trips_through_the_index() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("status.svg");
        fs::write(&input, master(&["a", "b", "c", "d", "e"])).unwrap();
        let out = dir.path().join("sprites");

        split(&SplitArgs {
            input,
            category: None,
            out: out.clone(),
            per_chunk: 2,
            chunks: None,
        })
        .unwrap();

        let manifest =
            SpriteManifest::from_toml_str(&fs::read_to_string(out.join(MANIFEST_FILE)).unwrap())
                .unwrap();
        assert_eq!(manifest.chunk_count(&"status".into()), Some(3));
        assert!(out.join("status/status-3.svg").exists());

        let dist = dir.path().join("dist");
        pack(&PackArgs {
            root: out.clone(),
            out: dist.clone(),
        })
        .unwrap();

        let index = ChunkIndex::new(&fs::read(dist.join("index.bin")).unwrap()).unwrap();
        let data = fs::read(dist.join("data.pack")).unwrap();
        assert_eq!(index.chunk_count(&"status".into()), Some(3));

        let location = index.locate(&"status".into(), 3).unwrap();
        let start = location.offset as usize;
        let chunk = &data[start..start + location.size as usize];
        assert_eq!(chunk, fs::read(out.join("status/status-3.svg")).unwrap());
    }

    #[test]
    fn resplitting_with_fewer_chunks_removes_stale_files() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("magic.svg");
        fs::write(&input, master(&["a", "b", "c", "d"])).unwrap();
        let out = dir.path().join("sprites");

        let mut args = SplitArgs {
            input,
            category: None,
            out: out.clone(),
            per_chunk: 1,
            chunks: None,
        };
        split(&args).unwrap();
        assert!(out.join("magic/magic-4.svg").exists());

        args.per_chunk = 2;
        split(&args).unwrap();
        assert!(out.join("magic/magic-2.svg").exists());
        assert!(!out.join("magic/magic-3.svg").exists());
        assert!(!out.join("magic/magic-4.svg").exists());
    }

    #[test]
    fn fixed_chunk_count_spreads_symbols_evenly() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("magic.svg");
        let ids: Vec<String> = (0..30).map(|n| format!("m{n}")).collect();
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        fs::write(&input, master(&ids)).unwrap();
        let out = dir.path().join("sprites");

        split(&SplitArgs {
            input,
            category: None,
            out: out.clone(),
            per_chunk: 64,
            chunks: Some(26),
        })
        .unwrap();

        let manifest =
            SpriteManifest::from_toml_str(&fs::read_to_string(out.join(MANIFEST_FILE)).unwrap())
                .unwrap();
        assert_eq!(manifest.chunk_count(&"magic".into()), Some(26));
        let first = fs::read_to_string(out.join("magic/magic-1.svg")).unwrap();
        assert!(first.contains("id=\"m0\"") && first.contains("id=\"m1\""));
        let last = fs::read_to_string(out.join("magic/magic-26.svg")).unwrap();
        assert!(last.contains("id=\"m29\"") && !last.contains("id=\"m28\""));
    }

    #[test]
    fn directory_input_splits_every_master() {
        let dir = tempdir().unwrap();
        let masters = dir.path().join("masters");
        fs::create_dir_all(&masters).unwrap();
        fs::write(masters.join("magic.svg"), master(&["fire"])).unwrap();
        fs::write(masters.join("status.svg"), master(&["burn", "sleep"])).unwrap();
        fs::write(masters.join("notes.txt"), "ignored").unwrap();

        let found = find_masters(&masters, None).unwrap();
        let names: Vec<&str> = found.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, ["magic", "status"]);

        assert!(find_masters(&masters, Some("magic")).is_err());
    }

    #[test]
    fn pack_without_manifest_fails() {
        let dir = tempdir().unwrap();
        let result = pack(&PackArgs {
            root: dir.path().to_path_buf(),
            out: dir.path().join("dist"),
        });
        assert!(result.is_err());
    }
}
