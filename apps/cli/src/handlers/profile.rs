use super::{Output, load_kb};
use anyhow::Result;
use serde::Serialize;
use wspec::domain::config::AppConfig;
use wspec::domain::persona::Persona;
use wspec::knowledge::PersonaScore;

#[derive(Serialize)]
struct Answer<'kb> {
    personas: Vec<Persona>,
    scores: Vec<PersonaScore<'kb>>,
}

pub fn profile(config: &AppConfig, paths: &[String], apps: &[String], output: Output) -> Result<()> {
    let kb = load_kb(config)?;
    let profiler = kb.profiler();

    let answer = Answer { personas: profiler.best(paths, apps), scores: profiler.rank(paths, apps) };

    output.emit(&answer, || {
        let labels: Vec<_> = answer.personas.iter().map(|p| p.as_str()).collect();
        println!("Persona: {}", labels.join(", "));
        for score in &answer.scores {
            println!(
                "  {:<14} {:>2}  markers: [{}]  apps: [{}]",
                score.persona.as_str(),
                score.score,
                score.markers.join(", "),
                score.keywords.join(", "),
            );
        }
    })
}
