//! Initial schema migration - creates all tables from scratch.
//!
//! - `categories`: recipe classification
//! - `ingredients`: cost basis (base unit + cost per base unit)
//! - `recipes`: technical sheets
//! - `recipe_items`: ingredient lines of a recipe
//! - `recipe_components`: sub-recipes used by a recipe
//! - `staff_roles`: role catalog with a default hourly rate
//! - `events`: catered jobs
//! - `menu_items`: recipes served at an event
//! - `staff_participations`: staff hired for an event
//!
//! Decimal values are stored as text; ids are UUID blobs.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    NameNorm,
    Description,
}

#[derive(Iden)]
enum Ingredients {
    Table,
    Id,
    Name,
    NameNorm,
    BaseUnit,
    CostPerUnit,
    Photo,
}

#[derive(Iden)]
enum Recipes {
    Table,
    Id,
    Title,
    CategoryId,
    Discipline,
    CookingMethod,
    CookingTimeMin,
    PrepTimeMin,
    Photo,
    Preparation,
    Notes,
    YieldTotal,
    YieldUnit,
    PortionWeight,
}

#[derive(Iden)]
enum RecipeItems {
    Table,
    Id,
    RecipeId,
    Position,
    IngredientId,
    Unit,
    GrossWeight,
    NetWeight,
    CorrectionFactor,
    HouseholdMeasure,
}

#[derive(Iden)]
enum RecipeComponents {
    Table,
    Id,
    RecipeId,
    Position,
    SubRecipeId,
    Quantity,
    Unit,
}

#[derive(Iden)]
enum StaffRoles {
    Table,
    Id,
    Name,
    NameNorm,
    DefaultHourlyRate,
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
    Name,
    Date,
    Headcount,
    IndirectCost,
    ProfitMarginPercent,
}

#[derive(Iden)]
enum MenuItems {
    Table,
    Id,
    EventId,
    Position,
    RecipeId,
    PortionsPerPerson,
    Photo,
}

#[derive(Iden)]
enum StaffParticipations {
    Table,
    Id,
    EventId,
    Position,
    RoleId,
    Headcount,
    Hours,
    HourlyRate,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::NameNorm).string().not_null())
                    .col(
                        ColumnDef::new(Categories::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-name_norm-unique")
                    .table(Categories::Table)
                    .col(Categories::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Ingredients
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Ingredients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ingredients::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Ingredients::Name).string().not_null())
                    .col(ColumnDef::new(Ingredients::NameNorm).string().not_null())
                    .col(ColumnDef::new(Ingredients::BaseUnit).string().not_null())
                    .col(ColumnDef::new(Ingredients::CostPerUnit).string().not_null())
                    .col(ColumnDef::new(Ingredients::Photo).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ingredients-name_norm-unique")
                    .table(Ingredients::Table)
                    .col(Ingredients::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Recipes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Recipes::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Recipes::Title).string().not_null())
                    .col(ColumnDef::new(Recipes::CategoryId).blob().not_null())
                    .col(
                        ColumnDef::new(Recipes::Discipline)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Recipes::CookingMethod)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Recipes::CookingTimeMin)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Recipes::PrepTimeMin)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Recipes::Photo).string())
                    .col(
                        ColumnDef::new(Recipes::Preparation)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Recipes::Notes).text().not_null().default(""))
                    .col(ColumnDef::new(Recipes::YieldTotal).string().not_null())
                    .col(ColumnDef::new(Recipes::YieldUnit).string().not_null())
                    .col(ColumnDef::new(Recipes::PortionWeight).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recipes-category_id")
                            .from(Recipes::Table, Recipes::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-recipes-category_id")
                    .table(Recipes::Table)
                    .col(Recipes::CategoryId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Recipe items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(RecipeItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipeItems::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RecipeItems::RecipeId).blob().not_null())
                    .col(ColumnDef::new(RecipeItems::Position).integer().not_null())
                    .col(ColumnDef::new(RecipeItems::IngredientId).blob().not_null())
                    .col(ColumnDef::new(RecipeItems::Unit).string().not_null())
                    .col(ColumnDef::new(RecipeItems::GrossWeight).string())
                    .col(ColumnDef::new(RecipeItems::NetWeight).string())
                    .col(ColumnDef::new(RecipeItems::CorrectionFactor).string())
                    .col(
                        ColumnDef::new(RecipeItems::HouseholdMeasure)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recipe_items-recipe_id")
                            .from(RecipeItems::Table, RecipeItems::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recipe_items-ingredient_id")
                            .from(RecipeItems::Table, RecipeItems::IngredientId)
                            .to(Ingredients::Table, Ingredients::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-recipe_items-recipe_id-position")
                    .table(RecipeItems::Table)
                    .col(RecipeItems::RecipeId)
                    .col(RecipeItems::Position)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-recipe_items-ingredient_id")
                    .table(RecipeItems::Table)
                    .col(RecipeItems::IngredientId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Recipe components
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(RecipeComponents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipeComponents::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RecipeComponents::RecipeId).blob().not_null())
                    .col(
                        ColumnDef::new(RecipeComponents::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecipeComponents::SubRecipeId)
                            .blob()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecipeComponents::Quantity)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RecipeComponents::Unit).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recipe_components-recipe_id")
                            .from(RecipeComponents::Table, RecipeComponents::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recipe_components-sub_recipe_id")
                            .from(RecipeComponents::Table, RecipeComponents::SubRecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-recipe_components-recipe_id-position")
                    .table(RecipeComponents::Table)
                    .col(RecipeComponents::RecipeId)
                    .col(RecipeComponents::Position)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-recipe_components-sub_recipe_id")
                    .table(RecipeComponents::Table)
                    .col(RecipeComponents::SubRecipeId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Staff roles
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(StaffRoles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StaffRoles::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StaffRoles::Name).string().not_null())
                    .col(ColumnDef::new(StaffRoles::NameNorm).string().not_null())
                    .col(
                        ColumnDef::new(StaffRoles::DefaultHourlyRate)
                            .string()
                            .not_null()
                            .default("20"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-staff_roles-name_norm-unique")
                    .table(StaffRoles::Table)
                    .col(StaffRoles::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Events
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Events::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Events::Name).string().not_null())
                    .col(ColumnDef::new(Events::Date).date().not_null())
                    .col(ColumnDef::new(Events::Headcount).integer().not_null())
                    .col(
                        ColumnDef::new(Events::IndirectCost)
                            .string()
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(Events::ProfitMarginPercent)
                            .string()
                            .not_null()
                            .default("30"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-events-date")
                    .table(Events::Table)
                    .col(Events::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Menu items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MenuItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MenuItems::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MenuItems::EventId).blob().not_null())
                    .col(ColumnDef::new(MenuItems::Position).integer().not_null())
                    .col(ColumnDef::new(MenuItems::RecipeId).blob().not_null())
                    .col(
                        ColumnDef::new(MenuItems::PortionsPerPerson)
                            .string()
                            .not_null()
                            .default("1"),
                    )
                    .col(ColumnDef::new(MenuItems::Photo).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-menu_items-event_id")
                            .from(MenuItems::Table, MenuItems::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-menu_items-recipe_id")
                            .from(MenuItems::Table, MenuItems::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-menu_items-event_id-position")
                    .table(MenuItems::Table)
                    .col(MenuItems::EventId)
                    .col(MenuItems::Position)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Staff participations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(StaffParticipations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StaffParticipations::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StaffParticipations::EventId)
                            .blob()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StaffParticipations::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StaffParticipations::RoleId).blob().not_null())
                    .col(
                        ColumnDef::new(StaffParticipations::Headcount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(StaffParticipations::Hours)
                            .string()
                            .not_null()
                            .default("1"),
                    )
                    .col(ColumnDef::new(StaffParticipations::HourlyRate).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-staff_participations-event_id")
                            .from(StaffParticipations::Table, StaffParticipations::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-staff_participations-role_id")
                            .from(StaffParticipations::Table, StaffParticipations::RoleId)
                            .to(StaffRoles::Table, StaffRoles::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-staff_participations-event_id-position")
                    .table(StaffParticipations::Table)
                    .col(StaffParticipations::EventId)
                    .col(StaffParticipations::Position)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StaffParticipations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MenuItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StaffRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeComponents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ingredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        Ok(())
    }
}
