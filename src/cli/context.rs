use anyhow::Result;

use jot::config::JotConfig;
use jot::journal::context::ContextPlan;

use super::open_store;

/// Print the context block a question would be answered from.
pub fn context(config: &JotConfig, query: &str) -> Result<()> {
    let store = open_store(config)?;
    let plan = ContextPlan::new(query, store.entries(), config.context.limits());

    println!("{}", plan.render());
    eprintln!(
        "{} relevant, {} recent, {} older in {} month(s); {} of {} entries accounted for.",
        plan.relevant.len(),
        plan.recent.len(),
        plan.older.iter().map(|m| m.count).sum::<usize>(),
        plan.older.len(),
        plan.accounted(),
        plan.total
    );
    Ok(())
}
