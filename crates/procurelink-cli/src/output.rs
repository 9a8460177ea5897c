use anyhow::Result;
use colored::Colorize;
use procurelink_automation::{AutomationReport, DryRunReport, StepStatus};
use procurelink_core::TargetRegistry;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_registry_table(registry: &TargetRegistry) {
    if registry.is_empty() {
        println!("No target types registered.");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["Type", "Name", "Icon", "Attach docs", "Notify", "Sync metadata"]);
    for config in registry.iter() {
        builder.push_record([
            config.kind.as_str().to_string(),
            config.display_name.clone(),
            config.icon.clone(),
            yes_no(config.automation.auto_attach_documents),
            yes_no(config.automation.create_notification),
            yes_no(config.automation.sync_metadata),
        ]);
    }
    println!("{}", builder.build().with(Style::rounded()));
}

pub fn print_report_table(label: &str, report: &AutomationReport) {
    println!(
        "{} {} → {} ({} ms)",
        "Automation:".cyan(),
        label,
        report.target,
        report.duration_ms
    );
    let mut builder = Builder::default();
    builder.push_record(["Step", "Status", "Detail"]);
    for step in &report.steps {
        let status = match step.status {
            StepStatus::Completed => step.status.to_string().green(),
            StepStatus::Skipped => step.status.to_string().yellow(),
            StepStatus::Failed => step.status.to_string().red(),
        };
        builder.push_record([step.step.to_string(), status.to_string(), step.detail.clone()]);
    }
    println!("{}", builder.build().with(Style::rounded()));

    let mut totals = vec![
        format!("attachments copied: {}", report.attachments_copied),
        format!("emails sent: {}", report.emails_sent),
    ];
    if let Some(id) = report.maintenance_record_id {
        totals.push(format!("maintenance: #{id}"));
    }
    if !report.categories.is_empty() {
        let names: Vec<_> = report.categories.iter().map(|c| c.as_str()).collect();
        totals.push(format!("categories: {}", names.join(", ")));
    }
    println!("{}", totals.join(" | "));
}

pub fn print_dry_run_table(label: &str, report: &DryRunReport) {
    println!("{} {}", "Dry run:".cyan(), label);
    let categories: Vec<_> = report.categories.iter().map(|c| c.as_str()).collect();
    let mut builder = Builder::default();
    builder.push_record(["Target", "Metadata sync", "Documents", "Notifications", "Categories"]);
    builder.push_record([
        report.target.clone().unwrap_or_else(|| "-".to_string()),
        yes_no(report.metadata_sync),
        report.documents_to_attach.to_string(),
        report.notifications_to_create.to_string(),
        categories.join(", "),
    ]);
    println!("{}", builder.build().with(Style::rounded()));
    for error in &report.errors {
        print_warning(error);
    }
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}
