use super::{Output, load_kb};
use anyhow::Result;
use wspec::domain::config::AppConfig;

pub fn list(config: &AppConfig, output: Output) -> Result<()> {
    let kb = load_kb(config)?;
    let rules = kb.heuristic_rules();

    output.emit(rules, || {
        for (category, rule) in rules {
            let mode = if rule.heuristic { "heuristic" } else { "direct" };
            println!("{category} ({mode}, safety {})", rule.safety);
            if !rule.description.is_empty() {
                println!("  {}", rule.description);
            }
            for root in rule.roots() {
                println!("  root: {}", root.display());
            }
            if let Some(days) = rule.age_days {
                println!("  older than {days} day(s)");
            }
            if !rule.extensions.is_empty() {
                println!("  extensions: {}", rule.extensions.join(", "));
            }
        }
    })
}
