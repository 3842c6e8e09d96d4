// src/cli/models.rs — `promptstudio models`

use crate::provider::catalog::ModelCatalog;

pub fn list_models(catalog: &ModelCatalog) {
    for (i, m) in catalog.models().iter().enumerate() {
        let marker = if i == 0 { "*" } else { " " };
        println!("{marker} {:<44} {}", m.id, m.name);
    }
    eprintln!("\n  * default model. Override with --model or [studio] default_model.");
}
