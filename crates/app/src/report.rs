//! Plain-text rendering of the engine reports.
//!
//! Values that cannot be computed (no portion weight, no guests) print as
//! `n/a`, never as zero.

use std::{fmt::Display, path::Path};

use engine::{EventPricing, RecipeCostSheet, ShoppingListRow};

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "n/a".to_string(), |value| value.to_string())
}

pub fn print_cost_sheet(sheet: &RecipeCostSheet) {
    println!("{}", sheet.title);
    println!(
        "yield {} {} | portion {} | portions {}",
        sheet.yield_total.normalize(),
        sheet.yield_unit,
        or_na(sheet.portion_weight.map(|weight| weight.normalize())),
        or_na(sheet.portion_count),
    );
    println!();
    for line in &sheet.lines {
        let marker = if line.fallback { " *" } else { "" };
        println!(
            "  {:<30} {:>10} {:<4} {:>10}{marker}",
            line.ingredient,
            or_na(line.net_quantity.map(|quantity| quantity.normalize())),
            line.unit.code(),
            line.cost,
        );
    }
    for component in &sheet.components {
        println!(
            "  {:<30} {:>10} {:<4} {:>10}",
            format!("[{}]", component.sub_recipe),
            component.quantity.normalize(),
            component.unit.code(),
            component.cost,
        );
    }
    println!();
    println!("  total cost        {:>10}", sheet.total_cost);
    println!("  cost per portion  {:>10}", or_na(sheet.cost_per_portion));
    for warning in &sheet.warnings {
        println!("  * {warning}");
    }
}

pub fn print_event_pricing(pricing: &EventPricing) {
    println!("{} ({} guests)", pricing.name, pricing.headcount);
    println!();
    for item in &pricing.menu {
        println!(
            "  {:<30} {:>6} pp x {:>8} {:>10}",
            item.recipe,
            item.portions_per_person.normalize(),
            or_na(item.cost_per_portion),
            item.cost,
        );
    }
    for staff in &pricing.staff {
        println!(
            "  {:<30} {:>3} x {:>5}h x {:>8} {:>10}",
            staff.role,
            staff.headcount,
            staff.hours.normalize(),
            staff.hourly_rate,
            staff.cost,
        );
    }
    println!();
    println!("  recipes           {:>10}", pricing.recipes_cost);
    println!("  staff             {:>10}", pricing.staff_cost);
    println!("  indirect          {:>10}", pricing.indirect_cost);
    println!("  total cost        {:>10}", pricing.total_cost);
    println!(
        "  sale price ({}%) {:>10}",
        pricing.profit_margin_percent.normalize(),
        pricing.sale_price
    );
    println!("  estimated profit  {:>10}", pricing.estimated_profit);
    let per_person = pricing.headcount > 0;
    println!(
        "  cost per person   {:>10}",
        or_na(per_person.then_some(pricing.cost_per_person))
    );
    println!(
        "  price per person  {:>10}",
        or_na(per_person.then_some(pricing.sale_price_per_person))
    );
}

pub fn print_shopping_list(rows: &[ShoppingListRow]) {
    for row in rows {
        println!(
            "  {:<30} {:>12} {:<4} {:>10}",
            row.ingredient,
            row.quantity.normalize(),
            row.unit.code(),
            row.total_cost,
        );
    }
}

pub fn write_shopping_list_csv(
    path: &Path,
    rows: &[ShoppingListRow],
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
