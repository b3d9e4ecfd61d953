use super::SchemaSource;
use anyhow::Result;
use crud_scaffold::{Component, FileStatus, GenerateOptions, Generator, WriteOptions};
use std::path::PathBuf;

pub struct MakeOptions {
    pub route: Option<String>,
    pub only: Option<Component>,
    pub force: bool,
    pub dry_run: bool,
}

/// Generate and write the CRUD files of `table`
pub async fn run(
    project_path: PathBuf,
    source: SchemaSource,
    table: String,
    options: MakeOptions,
) -> Result<()> {
    let config = source.load_config()?;
    let catalog = source.open_catalog(&config).await?;
    let generator = Generator::new(catalog.as_ref(), config);

    let table = table.trim();
    let plan = generator
        .generate(
            table,
            &GenerateOptions {
                route: options.route,
                only: options.only,
            },
        )
        .await?;

    let report = plan
        .write(
            &project_path,
            &WriteOptions {
                force: options.force,
                dry_run: options.dry_run,
            },
        )
        .await?;

    if report.dry_run {
        println!("🔍 Dry run for {} ({} file(s))", plan.model_name, report.files.len());
        for (path, status) in &report.files {
            println!("   {:<12} {}", status.to_string(), path.display());
        }
        return Ok(());
    }

    println!(
        "✅ {}: {} created, {} overwritten, {} skipped",
        plan.model_name,
        report.count(FileStatus::Created),
        report.count(FileStatus::Overwritten),
        report.count(FileStatus::Skipped)
    );
    if report.count(FileStatus::Skipped) > 0 && !options.force {
        println!("   Use --force to overwrite existing files");
    }
    Ok(())
}
