use super::{Output, load_kb};
use anyhow::Result;
use serde::Serialize;
use wspec::domain::component::ComponentKind;
use wspec::domain::config::AppConfig;
use wspec::knowledge::RuleConflict;

#[derive(Serialize)]
struct Summary<'a> {
    critical: usize,
    recommended_removal: usize,
    heuristic_rules: usize,
    blocklisted_domains: usize,
    annotated_domains: usize,
    conflicts: &'a [RuleConflict],
}

/// Loads every configured file and prints counts. Fails on any load error.
pub fn validate(config: &AppConfig, strict: bool, output: Output) -> Result<()> {
    let mut config = config.clone();
    if strict {
        config.knowledge.strict = true;
    }
    let kb = load_kb(&config)?;
    let rules = kb.rules();

    let summary = Summary {
        critical: rules.absolutely_critical.len(),
        recommended_removal: rules.highly_recommended_to_remove.len(),
        heuristic_rules: kb.heuristic_rules().len(),
        blocklisted_domains: kb.blocklist().len(),
        annotated_domains: kb.domains().len(),
        conflicts: kb.conflicts(),
    };

    output.emit(&summary, || {
        println!("Knowledge base OK: {}", config.knowledge.kb_path.display());
        for kind in ComponentKind::ALL {
            println!(
                "  {:<16} critical: {:>3}  removable: {:>3}",
                kind.section_key(),
                rules.absolutely_critical.get(kind).len(),
                rules.highly_recommended_to_remove.get(kind).len(),
            );
        }
        println!("  heuristic rules: {}", summary.heuristic_rules);
        println!("  blocklisted domains: {}", summary.blocklisted_domains);
        println!("  annotated domains: {}", summary.annotated_domains);
        for conflict in summary.conflicts {
            println!("  conflict: {conflict}");
        }
    })
}
