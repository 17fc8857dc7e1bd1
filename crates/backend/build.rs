use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");

    // OUT_DIR is target/<profile>/build/backend-xxx/out; config goes to target/<profile>
    let out_dir = env::var("OUT_DIR").unwrap();
    let profile = env::var("PROFILE").unwrap();
    let out_path = Path::new(&out_dir);
    let Some(target_dir) = out_path.ancestors().find(|p| p.ends_with(&profile)) else {
        println!("cargo:warning=target profile directory not found, config.toml not copied");
        return;
    };

    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("Could not find workspace root");

    let source_config = workspace_root.join("config.toml");
    let dest_config = target_dir.join("config.toml");

    if source_config.exists() {
        fs::copy(&source_config, &dest_config)
            .unwrap_or_else(|e| panic!("Failed to copy config.toml: {}", e));
    } else {
        println!(
            "cargo:warning=config.toml not found at {:?}, the embedded default will be used",
            source_config
        );
    }
}
