use colored::Colorize;
use storypack_pipeline::{load_story, ExportConfig, ExportReport, Exporter, Importer};
use storypack_types::ResourceCategory;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::default(),
    };
    match cli.command {
        Command::Export(args) => cmd_export(args, config, &cli.format).await,
        Command::Import(args) => cmd_import(args, config, &cli.format).await,
        Command::Restore(args) => cmd_restore(args, config, &cli.format).await,
        Command::Inspect(args) => cmd_inspect(args, config, &cli.format).await,
    }
}

async fn cmd_export(args: ExportArgs, config: ExportConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let story = load_story(&args.root, &config).await?;
    let report = Exporter::new(config).export_resources(&story).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_export(&report),
    }
    Ok(())
}

fn print_export(report: &ExportReport) {
    println!("{} Exported {}", "✓".green().bold(), report.story_id.bold());
    for chapter in &report.chapters {
        println!(
            "  {} {} new resources, {} files → {}",
            chapter.chapter_id.yellow(),
            chapter.delta.len(),
            chapter.files_copied,
            chapter.archive.display()
        );
        for category in ResourceCategory::ALL {
            let ids = chapter.delta.get(category).sorted();
            if !ids.is_empty() {
                println!("    {}: {}", category.to_string().cyan(), ids.join(", "));
            }
        }
        if chapter.unresolved > 0 {
            println!("    {} {} not in blackboard", "!".red(), chapter.unresolved);
        }
    }
    for id in &report.skipped {
        println!("  {} {} (no flow document)", "skipped".dimmed(), id);
    }
    println!("  Story archive: {}", report.story_archive.display());
    println!("  Header: {}", report.header_path.display());
}

async fn cmd_import(args: ImportArgs, config: ExportConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let project = Importer::new(config)
        .import_story(&args.header, &args.destination)
        .await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "project": project })),
        OutputFormat::Text => println!("{} Imported into {}", "✓".green().bold(), project.display().to_string().bold()),
    }
    Ok(())
}

async fn cmd_restore(args: RestoreArgs, config: ExportConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let target = Importer::new(config)
        .restore_chapter(&args.archive, &args.target)
        .await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "target": target })),
        OutputFormat::Text => println!("{} Restored into {}", "✓".green().bold(), target.display().to_string().bold()),
    }
    Ok(())
}

async fn cmd_inspect(args: InspectArgs, config: ExportConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let header = Importer::new(config).read_header(&args.header).await?;
    match format {
        OutputFormat::Json => println!("{}", header.to_json()?),
        OutputFormat::Text => {
            println!("Story {}", header.story.bold());
            for (i, chapter) in header.chapters.iter().enumerate() {
                println!("  {:>3}. {}", i + 1, chapter.yellow());
            }
        }
    }
    Ok(())
}
