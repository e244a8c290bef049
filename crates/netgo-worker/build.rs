//! Records the short commit hash and the dirty flag for
//! `netgo_worker::version::build_version`.

use vergen_gitcl::{Emitter, GitclBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracked changes only; untracked files do not mark the build dirty.
    let git = GitclBuilder::default().sha(true).dirty(false).build()?;
    Emitter::default().add_instructions(&git)?.emit()?;
    Ok(())
}
