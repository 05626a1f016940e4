use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandRegistry};

const TOPICS: &[(&str, &[&str])] = &[
    ("Packages", &["import", "packages", "summary", "match"]),
    ("Catalog", &["procedure", "procedures", "branch"]),
    ("Tiered pricing", &["item", "rows", "validate", "round"]),
    ("Storage", &["save", "load"]),
    ("Shell", &["help", "version", "exit"]),
];

const IMPORT_NOTES: &[&str] = &[
    "One package per line:",
    "  슈링크300+인모드fx 얼전 690,000원",
    "  파워윤곽주사 3회 99,000원",
    "Or blocks opened by ■ with ㄴ sub-items:",
    "  ■리프팅 패키지 39만원 (부가세별도)",
    "  ㄴ슈링크: 1체 9.9만원 / 이벤트 15만원",
];

const PRICE_NOTES: &[&str] = &["Prices accept 99000, 99,000원, 9.9만 or 9.9만원."];

/// Lists commands grouped by what they work on, in registration order
/// within each group.
pub fn print_overview(registry: &CommandRegistry) {
    output_section("Available commands");
    let entries = registry.list();
    let mut listed = 0;
    for (topic, names) in TOPICS {
        let group: Vec<&&CommandEntry> = entries
            .iter()
            .filter(|entry| names.contains(&entry.name))
            .collect();
        if group.is_empty() {
            continue;
        }
        io::print_info(format!("{}:", topic));
        for entry in group {
            io::print_info(format!("  {:<11} {}", entry.name, entry.description));
            listed += 1;
        }
    }
    if listed < entries.len() {
        io::print_info("Other:");
        for entry in entries
            .iter()
            .filter(|entry| !TOPICS.iter().any(|(_, names)| names.contains(&entry.name)))
        {
            io::print_info(format!("  {:<11} {}", entry.name, entry.description));
        }
    }
    io::print_info("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry) {
    output_section(format!("Help: {}", entry.name));
    io::print_info(format!("  {}", entry.description));
    for usage in entry.usage.split(" | ") {
        io::print_info(format!("  usage: {}", usage));
    }
    for note in notes_for(entry.name) {
        io::print_info(format!("  {}", note));
    }
}

fn notes_for(name: &str) -> &'static [&'static str] {
    match name {
        "import" => IMPORT_NOTES,
        "procedure" | "item" => PRICE_NOTES,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_topic_names_distinct_commands() {
        let mut seen: Vec<&str> = TOPICS
            .iter()
            .flat_map(|(_, names)| names.iter().copied())
            .collect();
        let total = seen.len();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), total);
    }

    #[test]
    fn grammar_notes_only_for_import() {
        assert!(!notes_for("import").is_empty());
        assert!(notes_for("rows").is_empty());
    }
}
