use anyhow::{bail, Result};
use std::io::Write;

use jot::config::JotConfig;

use super::open_store;

/// Delete one entry, after confirmation unless `yes` is set.
pub fn delete(config: &JotConfig, id: &str, yes: bool) -> Result<()> {
    let mut store = open_store(config)?;
    let Some(entry) = store.get(id) else {
        bail!("entry not found: {id}");
    };

    if !yes {
        println!("Delete \"{}\"?", entry.display_name());
        if entry.is_template() {
            println!("This entry is a custom template; its slot will be freed.");
        }
        print!("Type y to confirm: ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            bail!("delete cancelled");
        }
    }

    let removed = store.delete(id)?;
    println!("Deleted \"{}\".", removed.display_name());
    Ok(())
}
