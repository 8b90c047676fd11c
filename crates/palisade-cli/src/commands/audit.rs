//! Audit command: report the install-time guard of every field.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color};
use palisade::{GuardKind, Palisade, Resolvers};

use crate::style::colors::SemanticStyle;
use crate::style::{colored_cell, print_success, print_warn, styled_table};

pub fn run(palisade: &Palisade, schema_path: &Path, strict: bool) -> Result<()> {
    let schema = palisade
        .authorize_document(schema_path, &Resolvers::new())
        .with_context(|| format!("Failed to authorize {}", schema_path.display()))?;

    let rows = schema
        .guards()
        .map(|field| {
            let state = match field.kind() {
                GuardKind::Guarded => colored_cell(field.kind(), Color::Green),
                GuardKind::Passthrough => colored_cell(field.kind(), Color::Blue),
                GuardKind::AlwaysDenied => colored_cell(field.kind(), Color::Red),
            };
            let requirement = field
                .effective_requirement()
                .map_or_else(|| "-".to_string(), ToString::to_string);
            vec![
                Cell::new(format!("{}.{}", field.type_name, field.field_name)),
                state,
                Cell::new(requirement),
            ]
        })
        .collect();

    println!("{}", styled_table(&["Field", "Guard", "Requirement"], rows));

    let summary = schema.summary();
    println!(
        "{}",
        format!(
            "{} types, {} guarded, {} passthrough, {} denied by default",
            summary.types, summary.guarded, summary.passthrough, summary.denied_by_default
        )
        .muted()
    );

    if summary.denied_by_default == 0 {
        print_success("Every field declares its access control");
        return Ok(());
    }

    for field in schema.denied_by_default() {
        print_warn(&format!(
            "No access control specified for {}.{}",
            field.type_name, field.field_name
        ));
    }

    if strict {
        anyhow::bail!(
            "{} field(s) denied by default",
            summary.denied_by_default
        );
    }

    Ok(())
}
