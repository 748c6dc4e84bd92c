use crate::infra::parse_date;
use chrono::{Local, NaiveDate};
use clap::Args;
use parking_ai::error::AppError;
use parking_ai::tenants::{TenantDirectory, TenantId};
use parking_ai::workflows::redemption::{
    inventory_from_path, usage_from_path, DayKind, InventorySnapshot, RedemptionError,
    RedemptionPlan, RedemptionPlanner, UsageSnapshot,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct PlanArgs {
    /// Tenant to plan for (store_a .. store_e)
    #[arg(long, value_parser = parse_tenant, default_value = "store_b")]
    tenant: TenantId,
    /// Plan date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Force weekend rules regardless of the date
    #[arg(long)]
    weekend: bool,
    /// Usage export scraped from the portal (scope,coupon,quantity)
    #[arg(long)]
    usage_csv: Option<PathBuf>,
    /// Inventory export scraped from the portal (coupon,car,total)
    #[arg(long)]
    inventory_csv: Option<PathBuf>,
}

fn parse_tenant(raw: &str) -> Result<TenantId, String> {
    TenantId::from_slug(raw).ok_or_else(|| format!("unknown tenant '{raw}'"))
}

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), AppError> {
    let PlanArgs {
        tenant,
        date,
        weekend,
        usage_csv,
        inventory_csv,
    } = args;

    let directory = Arc::new(TenantDirectory::standard());
    let profile = directory
        .get(tenant)
        .ok_or(RedemptionError::UnknownTenant(tenant))?
        .clone();

    let usage = match usage_csv {
        Some(path) => usage_from_path(path, profile.adapter())?,
        None => UsageSnapshot::default(),
    };

    let inventory = match inventory_csv {
        Some(path) => inventory_from_path(path, profile.adapter())?,
        None => assumed_full_stock(&profile),
    };

    let day = if weekend {
        DayKind::Weekend
    } else {
        DayKind::for_date(date.unwrap_or_else(|| Local::now().date_naive()))
    };

    let planner = RedemptionPlanner::new(directory);
    let plan = planner.plan(tenant, &usage, &inventory, day)?;

    render_plan(&plan);
    Ok(())
}

/// Without an inventory export the demo assumes the portal has plenty of
/// stock, mirroring the portals that report no counter at all.
fn assumed_full_stock(profile: &parking_ai::tenants::TenantProfile) -> InventorySnapshot {
    let mut inventory = InventorySnapshot::default();
    for definition in profile.catalog.definitions() {
        inventory.record(definition.key.clone(), 999);
    }
    inventory
}

fn render_plan(plan: &RedemptionPlan) {
    println!("Redemption plan for {}", plan.tenant);
    println!(
        "Day type: {} (target {} minutes, {} already granted)",
        plan.day.label(),
        plan.target_minutes,
        plan.current_minutes
    );

    if plan.requested.is_empty() {
        println!("\nRaw demand: none (target already met)");
    } else {
        println!("\nRaw demand");
        for entry in plan.requested.entries() {
            println!("- {} x{}", entry.key, entry.count);
        }
    }

    if plan.applications.is_empty() {
        println!("\nApplications: none");
    } else {
        println!("\nApplications");
        for application in &plan.applications {
            println!(
                "- {} ({}) x{}",
                application.display_name,
                application.category.label(),
                application.count
            );
        }
    }

    println!(
        "\nProjected: +{} minutes, gap covered: {}",
        plan.projected_minutes,
        if plan.target_met { "yes" } else { "NO" }
    );
}
