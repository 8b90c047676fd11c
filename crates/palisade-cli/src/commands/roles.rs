//! Roles command: print the effective role table.

use comfy_table::{Cell, Color};
use palisade::Palisade;

use crate::style::{colored_cell, styled_table};

pub fn run(palisade: &Palisade) {
    let rows = palisade
        .registry()
        .iter()
        .map(|role| {
            let permissions = if role.permissions.is_empty() {
                colored_cell("(none)", Color::DarkGrey)
            } else {
                Cell::new(
                    role.permissions
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", "),
                )
            };
            vec![Cell::new(role.id.as_str()), permissions]
        })
        .collect();

    println!("{}", styled_table(&["Role", "Permissions"], rows));
    println!(
        "Every principal also holds {}; unknown roles resolve to anonymous.",
        palisade::IMPLICIT_PERMISSION
    );
}
