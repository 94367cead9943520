//! User-facing reporting, kept separate from reconciliation and mutation

use crate::apply::ApplyPlan;
use crate::generator::GeneratorReport;
use crate::package::GeneratedPackage;
use crate::reconcile::{Action, Record};
use std::path::Path;

/// Renders run outcomes to the terminal; `silent` suppresses everything
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    silent: bool,
}

impl Reporter {
    pub fn new(silent: bool) -> Self {
        Self { silent }
    }

    pub fn line(&self, msg: &str) {
        if !self.silent {
            println!("{}", msg);
        }
    }

    /// Print "already matches the upgrade" warnings
    pub fn print_warnings(&self, records: &[Record]) {
        if self.silent {
            return;
        }
        let warnings: Vec<&Record> = records
            .iter()
            .filter(|r| r.action == Action::Warning)
            .collect();
        for record in &warnings {
            println!(
                "⚠️  It looks like {} was correctly changed before the upgrade, but you should confirm",
                record.path
            );
        }
        if !warnings.is_empty() {
            println!();
        }
    }

    /// Announce every conflict the upgrade will leave behind
    pub fn print_conflict_notices(&self, records: &[Record]) {
        if self.silent {
            return;
        }
        let conflicted: Vec<&Record> = records
            .iter()
            .filter(|r| matches!(r.action, Action::Conflicted(_)))
            .collect();
        for record in &conflicted {
            println!(
                "❌ After upgrading you will need to resolve a conflict in {}",
                record.path
            );
        }
        if !conflicted.is_empty() {
            println!();
        }
    }

    /// Print what a generator run wrote
    pub fn print_generator_report(&self, report: &GeneratorReport, destination: &Path) {
        if self.silent {
            return;
        }
        println!("✅ Generated package at: {}", destination.display());
        for (i, path) in report.written.iter().enumerate() {
            let prefix = if i == report.written.len() - 1 {
                "└─"
            } else {
                "├─"
            };
            println!("{} add: {}", prefix, path.display());
        }
    }

    /// Print the available generators
    pub fn print_generator_list(&self, names: &[&str]) {
        if self.silent {
            return;
        }
        if names.is_empty() {
            println!("No generators found.");
            return;
        }
        println!("📦 Available generators:");
        for (i, name) in names.iter().enumerate() {
            let prefix = if i == names.len() - 1 { "└─" } else { "├─" };
            println!("{} {}", prefix, name);
        }
    }

    /// Print the final upgrade summary
    pub fn print_upgrade_summary(&self, package: &GeneratedPackage, plan: &ApplyPlan) {
        if self.silent {
            return;
        }
        println!("📦 Upgrade summary");
        println!("├─ Added: {}", plan.added.len());
        println!("├─ Updated: {}", plan.updated.len());
        println!("├─ Removed: {}", plan.removed.len());
        println!("├─ Merged: {}", plan.merged.len());
        println!("└─ Conflicts: {}", plan.conflicts.len());

        if plan.conflicts.is_empty() {
            println!("✅ Upgrade completed");
        } else {
            println!("⚠️  Upgrade completed with the following conflicts:");
            for path in &plan.conflicts {
                println!("   {}", package.live_path(path).display());
            }
        }
    }
}
