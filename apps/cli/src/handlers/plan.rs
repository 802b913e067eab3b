use super::{Output, load_kb};
use anyhow::{Context, Result};
use std::path::Path;
use wspec::domain::config::AppConfig;
use wspec::prelude::{OptimizationPlan, Persona, PersonaSet, PlanVetter};

/// Vets a plan file. With no `--persona` the plan is vetted as for a home user.
pub fn vet(config: &AppConfig, file: &Path, personas: &[Persona], output: Output) -> Result<()> {
    let kb = load_kb(config)?;
    let plan = OptimizationPlan::load(file).context("Plan could not be read")?;

    let personas: PersonaSet = if personas.is_empty() {
        Persona::HomeUser.into()
    } else {
        personas.iter().copied().collect()
    };

    let review = PlanVetter::new(&kb, personas).vet(plan);

    output.emit(&review, || {
        println!(
            "Accepted {} action(s) and {} cleanup decision(s)",
            review.accepted.action_plan.len(),
            review.accepted.cleanup_plan.len()
        );
        for action in &review.accepted.action_plan {
            println!("  + {} {}: {}", action.kind, action.id, action.action);
        }
        for (category, decision) in &review.accepted.cleanup_plan {
            let verb = if decision.clean { "clean" } else { "keep" };
            println!("  + cleanup {category}: {verb}");
        }
        if !review.rejected.is_empty() {
            println!("Rejected {} item(s)", review.rejected.len());
            for rejection in &review.rejected {
                println!("  - {}: {}", rejection.item, rejection.reason);
            }
        }
    })
}
