use super::SchemaSource;
use anyhow::Result;
use crud_scaffold::generator::TableDescription;
use crud_scaffold::Generator;

pub async fn run(source: SchemaSource, table: String, json: bool) -> Result<()> {
    let config = source.load_config()?;
    let catalog = source.open_catalog(&config).await?;
    let generator = Generator::new(catalog.as_ref(), config);

    let description = generator.describe(table.trim()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&description)?);
    } else {
        print_table(&description);
    }
    Ok(())
}

fn print_table(description: &TableDescription) {
    println!("📋 Table: {} (model {})", description.table, description.model_name);
    println!();
    println!("{:<24} {:<24} {:<8} {:<8} References", "Column", "Type", "Null", "Fillable");
    println!("{}", "-".repeat(80));
    for entry in &description.columns {
        let references = entry
            .foreign_key
            .target()
            .map(|(table, column)| format!("{}.{}", table, column))
            .unwrap_or_default();
        println!(
            "{:<24} {:<24} {:<8} {:<8} {}",
            entry.column.name,
            entry.column.sql_type,
            if entry.column.nullable { "YES" } else { "NO" },
            if entry.unwanted { "no" } else { "yes" },
            references
        );
    }

    println!();
    if description.relations.is_empty() {
        println!("No relations");
        return;
    }
    println!("🔗 Relations:");
    for relation in &description.relations.declarations {
        println!(
            "   {}() {} {} ({} -> {})",
            relation.method,
            relation.kind,
            relation.related_table,
            relation.foreign_key,
            relation.local_key
        );
    }
}
