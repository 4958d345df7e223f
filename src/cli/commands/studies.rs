//! Study catalog commands.

use console::style;

use interview_insights::StudyCatalog;

/// List all studies.
pub fn cmd_studies_list() -> anyhow::Result<()> {
    let catalog = StudyCatalog::builtin();

    println!("{}", style("Studies").bold());
    for study in catalog.all() {
        println!(
            "  {} {}  {}",
            style(format!("[{}]", study.id)).cyan(),
            study.title,
            style(format!("({})", study.persona)).dim()
        );
    }
    Ok(())
}

/// Show one study.
pub fn cmd_studies_show(id: &str) -> anyhow::Result<()> {
    let catalog = StudyCatalog::builtin();
    let study = catalog.require(id)?;

    println!("{}", style(&study.title).bold());
    println!("  {} {}", style("Persona:").dim(), study.persona);
    println!("  {} {}", style("ID:").dim(), study.id);
    println!();
    println!("{}", study.description);
    println!();
    println!(
        "{} insights analyze {} --snippet \"...\"",
        style("→").cyan(),
        study.id
    );
    Ok(())
}
