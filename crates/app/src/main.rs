use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{Engine, SubRecipeDepth};
use migration::{Migrator, MigratorTrait};
use settings::Database;
use uuid::Uuid;

mod report;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "cozinha")]
#[command(about = "Technical sheets, event quotes and shopping lists")]
struct Cli {
    /// Settings file, without extension (TOML).
    #[arg(long, default_value = settings::DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the technical sheet of a recipe.
    Recipe(ReportArgs),
    /// Print the priced quote of an event.
    Event(ReportArgs),
    /// Print the consolidated shopping list of an event.
    ShoppingList(ShoppingListArgs),
    /// List stored entities with their ids.
    List {
        #[arg(value_enum)]
        kind: ListKind,
    },
}

#[derive(Args, Debug)]
struct ReportArgs {
    id: Uuid,
    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ShoppingListArgs {
    #[command(flatten)]
    report: ReportArgs,
    /// Also write the rows to a CSV file.
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Override the configured sub-recipe depth.
    #[arg(long, value_enum)]
    depth: Option<Depth>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Depth {
    Direct,
    Full,
}

impl From<Depth> for SubRecipeDepth {
    fn from(value: Depth) -> Self {
        match value {
            Depth::Direct => SubRecipeDepth::Direct,
            Depth::Full => SubRecipeDepth::Full,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ListKind {
    Categories,
    Ingredients,
    Recipes,
    StaffRoles,
    Events,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "cozinha={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let conversions = settings.costing.conversion_table()?;
    let db = parse_database(&settings.database).await?;
    let engine = Engine::builder()
        .database(db)
        .conversions(conversions)
        .sub_recipe_depth(settings.costing.sub_recipe_depth)
        .build()
        .await?;

    if let Err(err) = run(&engine, cli.command).await {
        tracing::error!("{err}");
        return Err(err);
    }
    Ok(())
}

async fn run(
    engine: &Engine,
    command: Command,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match command {
        Command::Recipe(args) => {
            let sheet = engine.recipe_cost_sheet(args.id).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&sheet)?);
            } else {
                report::print_cost_sheet(&sheet);
            }
        }
        Command::Event(args) => {
            let pricing = engine.event_pricing(args.id).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&pricing)?);
            } else {
                report::print_event_pricing(&pricing);
            }
        }
        Command::ShoppingList(args) => {
            let depth = args
                .depth
                .map_or(engine.sub_recipe_depth(), SubRecipeDepth::from);
            let rows = engine
                .shopping_list_with_depth(args.report.id, depth)
                .await?;
            if let Some(path) = &args.csv {
                report::write_shopping_list_csv(path, &rows)?;
                tracing::info!("shopping list written to {}", path.display());
            }
            if args.report.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                report::print_shopping_list(&rows);
            }
        }
        Command::List { kind } => list(engine, kind).await?,
    }
    Ok(())
}

async fn list(
    engine: &Engine,
    kind: ListKind,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match kind {
        ListKind::Categories => {
            for category in engine.list_categories().await? {
                println!("{}  {}", category.id, category.name);
            }
        }
        ListKind::Ingredients => {
            for ingredient in engine.list_ingredients().await? {
                println!(
                    "{}  {} ({}/{})",
                    ingredient.id,
                    ingredient.name,
                    ingredient.cost_per_unit.normalize(),
                    ingredient.base_unit
                );
            }
        }
        ListKind::Recipes => {
            for recipe in engine.list_recipes().await? {
                println!(
                    "{}  {} ({} {})",
                    recipe.id,
                    recipe.title,
                    recipe.yield_total.normalize(),
                    recipe.yield_unit
                );
            }
        }
        ListKind::StaffRoles => {
            for role in engine.list_staff_roles().await? {
                println!("{}  {} ({}/h)", role.id, role.name, role.default_hourly_rate);
            }
        }
        ListKind::Events => {
            for event in engine.list_events().await? {
                println!(
                    "{}  {} {} ({} guests)",
                    event.id, event.date, event.name, event.headcount
                );
            }
        }
    }
    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
