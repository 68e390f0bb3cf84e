//! List command implementation.
//!
//! The `baseline list` command prints the steps of the manifest, in
//! install order or (with `--reverse`) in uninstall order.

use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::runner::ExecutionPlanner;
use crate::steps::Step;
use crate::ui::{BaselineTheme, Cell, Table, UserInterface};

use super::context::CommandContext;
use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    ctx: CommandContext,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(ctx: &CommandContext, args: ListArgs) -> Self {
        Self {
            ctx: ctx.clone(),
            args,
        }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let loaded = self.ctx.load()?;
        let planner = if self.args.reverse {
            ExecutionPlanner::reverse(&loaded.registry)
        } else {
            ExecutionPlanner::forward(&loaded.registry)
        };

        if self.args.json {
            let json = serde_json::to_string_pretty(planner.view()).map_err(anyhow::Error::from)?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        show_steps(ui, planner.view());
        ui.show_hint(&format!("Manifest: {}", loaded.path.display()));
        Ok(CommandResult::success())
    }
}

/// Print `steps` as a table: id, name, principal, reboot flag, description.
pub fn show_steps(ui: &mut dyn UserInterface, steps: &[&Step]) {
    if steps.is_empty() {
        ui.message("No steps.");
        return;
    }

    let theme = BaselineTheme::detect();
    let mut table = Table::new(&["ID", "Step", "Runs as", "Reboot", "Description"]);
    for step in steps {
        table.add_row([
            Cell::plain(step.id.as_str()),
            Cell::plain(step.name.as_str()),
            Cell::plain(step.principal.to_string()),
            if step.reboot {
                Cell::styled("yes", &theme.warning)
            } else {
                Cell::default()
            },
            Cell::styled(step.description.as_str(), &theme.dim),
        ]);
    }
    ui.message(&table.render(&theme));
}
