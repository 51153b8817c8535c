//! Budget commands: allocation and goal projection, computed locally.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use finley_core::budget::{allocation_report, project_goal, validate_allocation};
use finley_types::budget::{BudgetAllocation, SavingsGoal};

fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Split an income and print the three amounts.
pub fn allocate(allocation: BudgetAllocation, json: bool) -> Result<()> {
    validate_allocation(&allocation)?;
    let report = allocation_report(&allocation);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Bucket").fg(Color::White),
        Cell::new("Share").fg(Color::White),
        Cell::new("Amount").fg(Color::White),
    ]);
    let rows = [
        ("Needs", allocation.needs_pct, report.breakdown.needs_amount, Color::Blue),
        ("Wants", allocation.wants_pct, report.breakdown.wants_amount, Color::Magenta),
        ("Savings", allocation.savings_pct, report.breakdown.savings_amount, Color::Green),
    ];
    for (name, pct, amount, color) in rows {
        table.add_row(vec![
            Cell::new(name).fg(color),
            Cell::new(format!("{pct}%")),
            Cell::new(money(amount)),
        ]);
    }

    println!();
    println!(
        "  {} Monthly income {}",
        style("$").bold(),
        style(money(allocation.monthly_income)).cyan()
    );
    println!("{table}");
    if !report.balanced {
        println!(
            "  {} Percentages add up to {}%, not 100%.",
            style("!").yellow().bold(),
            report.percent_total
        );
    }
    println!();
    Ok(())
}

/// Project a savings goal from today.
pub fn goal(target: f64, current: f64, deadline: NaiveDate, json: bool) -> Result<()> {
    let goal = SavingsGoal {
        target_amount: target,
        current_amount: current,
        deadline: Some(deadline),
    };
    let projection = project_goal(&goal, Utc::now().date_naive());

    if json {
        println!("{}", serde_json::to_string_pretty(&projection)?);
        return Ok(());
    }

    println!();
    if projection.completed {
        println!(
            "  {} Goal reached ({:.0}% of {})",
            style("✓").green().bold(),
            projection.progress_pct,
            money(target)
        );
    } else {
        println!(
            "  Save {} per week to reach {} by {}",
            style(money(projection.weekly_target)).cyan().bold(),
            money(target),
            deadline
        );
        println!(
            "  {}",
            style(format!(
                "{} remaining, {:.0}% saved",
                money(projection.remaining),
                projection.progress_pct
            ))
            .dim()
        );
    }
    println!();
    Ok(())
}
