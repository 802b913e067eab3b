use super::{Output, load_kb};
use anyhow::Result;
use serde::Serialize;
use wspec::domain::config::AppConfig;
use wspec::prelude::DomainVerdict;

#[derive(Serialize)]
struct Answer<'a, 'kb> {
    name: &'a str,
    #[serde(flatten)]
    verdict: DomainVerdict<'kb>,
}

pub fn lookup(config: &AppConfig, name: &str, output: Output) -> Result<()> {
    let kb = load_kb(config)?;
    let verdict = kb.classifier().lookup_domain(name);

    output.emit(&Answer { name, verdict }, || match verdict {
        DomainVerdict::Annotated { entry } => {
            println!("{name}: annotated as {} ({})", entry.domain, entry.category);
            println!("  breakage risk: {}", entry.breakage_risk);
            if !entry.description.is_empty() {
                println!("  {}", entry.description);
            }
        },
        DomainVerdict::Blocklisted { entry } => {
            let group = entry.group.as_deref().unwrap_or("ungrouped");
            println!("{name}: blocklisted as {} [{group}]", entry.domain);
        },
        DomainVerdict::Unknown => println!("{name}: unknown"),
    })
}
