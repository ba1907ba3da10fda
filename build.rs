use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

// Loaded at startup, nothing is drawn without them.
const REQUIRED_TEXTURES: [&str; 2] = ["gold.png", "water.png"];

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets/*");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");
    for name in REQUIRED_TEXTURES {
        if !assets_src.join(name).exists() {
            println!("cargo:warning=assets/{name} is missing, the scene will never start drawing");
        }
    }

    // Served next to the wasm bundle, read from ./assets natively.
    if assets_src.exists() {
        let out_dir = env::var("OUT_DIR")?;
        let mut copy_options = CopyOptions::new();
        copy_options.overwrite = true;
        copy_items(&[assets_src], out_dir, &copy_options)?;
    }

    Ok(())
}
