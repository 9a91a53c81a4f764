use std::path::Path;

// `sqlx::migrate!` embeds the migrations at compile time, so any change to
// the directory has to trigger a rebuild of the crate.
fn main() {
    let migrations_dir = Path::new("migrations");
    if !migrations_dir.exists() {
        return;
    }

    println!("cargo:rerun-if-changed=migrations");
    if let Ok(entries) = std::fs::read_dir(migrations_dir) {
        for entry in entries.flatten() {
            println!("cargo:rerun-if-changed={}", entry.path().display());
        }
    }
}
