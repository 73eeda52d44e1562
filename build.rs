use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

/// Bundles `assets/` (textures, tile set, back button label) next to the build
/// output and exports its location, so a binary started outside the crate
/// root still finds them.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");
    if !assets_src.is_dir() {
        return Ok(());
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    copy_items(&[&assets_src], &out_dir, &copy_options)
        .with_context(|| format!("copying {} to {}", assets_src.display(), out_dir.display()))?;
    println!(
        "cargo:rustc-env=GENESIS_BUNDLED_ASSETS={}",
        out_dir.join("assets").display()
    );

    Ok(())
}
