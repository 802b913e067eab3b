use super::{Output, load_kb};
use anyhow::Result;
use serde::Serialize;
use wspec::domain::config::AppConfig;
use wspec::prelude::{Classification, ComponentKind};

#[derive(Serialize)]
struct Answer<'a> {
    kind: ComponentKind,
    id: &'a str,
    classification: Classification,
}

pub fn classify(config: &AppConfig, kind: ComponentKind, id: &str, output: Output) -> Result<()> {
    let kb = load_kb(config)?;
    let classification = kb.classifier().classify(kind, id);

    output.emit(&Answer { kind, id, classification }, || {
        println!("{kind} {id}: {classification}");
    })
}
