use std::path::Path;

use bw_core::{Ability, Character};
use bw_mechanics::advancement::learning_threshold;
use bw_mechanics::RulesConfig;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use crate::store;

fn tally_cells(ability: &Ability) -> [String; 3] {
    let r = &ability.record;
    [
        format!("{}/{}", r.routine.passed, r.routine.failed),
        format!("{}/{}", r.difficult.passed, r.difficult.failed),
        format!("{}/{}", r.challenging.passed, r.challenging.failed),
    ]
}

fn trait_table(rows: Vec<(String, &Ability, String)>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Trait", "Exponent", "Routine", "Difficult", "Challenging", "Notes"]);
    for (name, ability, notes) in rows {
        let [routine, difficult, challenging] = tally_cells(ability);
        table.add_row(vec![
            name,
            ability.to_string(),
            routine,
            difficult,
            challenging,
            notes,
        ]);
    }
    table
}

fn print_character(character: &Character, rules: &RulesConfig) {
    println!("  {}", character.name.bold());
    if character.fate > 0 {
        println!("  {}", format!("Fate {}", character.fate).yellow());
    }
    let condition = character.condition;
    if condition.wound_dice > 0 || condition.ob_penalty > 0 {
        println!(
            "  {}",
            format!(
                "wounded: -{}D, +{} Ob",
                condition.wound_dice, condition.ob_penalty
            )
            .red()
        );
    }
    println!();

    let stats = character
        .stats
        .iter()
        .map(|(name, ability)| {
            let notes = match ability.record.tax {
                0 => String::new(),
                tax => format!("tax {tax}"),
            };
            (name.to_string(), ability, notes)
        })
        .collect();
    println!("{}", trait_table(stats));

    let attributes = character
        .attributes
        .iter()
        .map(|(name, ability)| (name.to_string(), ability, String::new()))
        .collect();
    println!("{}", trait_table(attributes));

    if !character.skills.is_empty() {
        let skills = character
            .skills
            .iter()
            .map(|skill| {
                let notes = if skill.learning {
                    format!(
                        "learning {}/{}",
                        skill.ability.record.learning_progress,
                        learning_threshold(skill, rules)
                    )
                } else {
                    let roots: Vec<String> = skill.roots().iter().map(ToString::to_string).collect();
                    roots.join("/")
                };
                (skill.name.clone(), &skill.ability, notes)
            })
            .collect();
        println!("{}", trait_table(skills));
    }

    if !character.relationships.is_empty() {
        println!();
        for rel in &character.relationships {
            if rel.building {
                println!(
                    "  {} {}",
                    rel.name,
                    format!("(building, {})", rel.building_progress).dimmed()
                );
            } else {
                println!("  {}", rel.name);
            }
        }
    }
}

pub fn run(file: &Path, rules: Option<&Path>) -> Result<(), String> {
    let rules = match rules {
        Some(path) => RulesConfig::load(path).map_err(|e| e.to_string())?,
        None => RulesConfig::default(),
    };
    let character = store::load(file)?;
    print_character(&character, &rules);
    Ok(())
}
