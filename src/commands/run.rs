// {{{ Imports
use std::fmt::Write;

use crate::context::{Error, PoiseContext, TaggedError};
use crate::nuzlocke::error::TrackerError;

use super::discord::MessageContext;
use super::router::{execute, Command};
// }}}

// {{{ Toplevel
/// Manage your runs
#[poise::command(
	prefix_command,
	slash_command,
	subcommands("add", "delete", "select", "list", "view"),
	subcommand_required
)]
pub async fn run(_ctx: PoiseContext<'_>) -> Result<(), Error> {
	Ok(())
}
// }}}
// {{{ Add
pub async fn add_impl(
	ctx: &mut impl MessageContext,
	name: &str,
	generation: &str,
) -> Result<(), TaggedError> {
	let run = ctx.data().runs.add_run(name, generation)?;
	ctx.reply(&format!(
		"Run '{}' for generation '{}' added.",
		run.name, run.generation
	))
	.await?;

	Ok(())
}

/// Start tracking a new run
#[poise::command(prefix_command, slash_command)]
async fn add(
	mut ctx: PoiseContext<'_>,
	#[description = "Name of the run"] name: String,
	#[description = "Generation of the game"] generation: String,
) -> Result<(), Error> {
	let res = execute(&mut ctx, Command::AddRun { name, generation }).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Delete
pub async fn delete_impl(ctx: &mut impl MessageContext, name: &str) -> Result<(), TaggedError> {
	let run = ctx.data().runs.delete_run(name)?;
	ctx.reply(&format!("Run '{}' deleted.", run.name)).await?;
	Ok(())
}

/// Delete a run. Only runs without any pokémon can be deleted
#[poise::command(prefix_command, slash_command)]
async fn delete(
	mut ctx: PoiseContext<'_>,
	#[description = "Name of the run"] name: String,
) -> Result<(), Error> {
	let res = execute(&mut ctx, Command::DeleteRun { name }).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Select
pub async fn select_impl(ctx: &mut impl MessageContext, name: &str) -> Result<(), TaggedError> {
	let run = ctx.data().runs.select_run(name)?;
	ctx.reply(&format!("Run '{}' selected.", run.name)).await?;
	Ok(())
}

/// Make a run the target of `add` and `status`
#[poise::command(prefix_command, slash_command)]
async fn select(
	mut ctx: PoiseContext<'_>,
	#[description = "Name of the run"] name: String,
) -> Result<(), Error> {
	let res = execute(&mut ctx, Command::SelectRun { name }).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ List
pub async fn list_impl(ctx: &mut impl MessageContext) -> Result<(), TaggedError> {
	let runs = ctx.data().runs.list_runs()?;
	if runs.is_empty() {
		ctx.reply("No runs found.").await?;
		return Ok(());
	}

	let active = ctx.data().runs.get_active_run()?.map(|run| run.id);

	let mut response = String::from("Available runs:");
	for run in &runs {
		write!(response, "\n{run}")?;
		if Some(run.id) == active {
			write!(response, " (active)")?;
		}
	}

	ctx.reply(&response).await?;
	Ok(())
}

/// List every run
#[poise::command(prefix_command, slash_command)]
async fn list(mut ctx: PoiseContext<'_>) -> Result<(), Error> {
	let res = execute(&mut ctx, Command::ListRuns).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ View
pub async fn view_impl(ctx: &mut impl MessageContext, name: Option<&str>) -> Result<(), TaggedError> {
	let run = match name {
		Some(name) => ctx.data().runs.get_run(name)?,
		None => ctx.data().runs.get_active_run()?.ok_or(TrackerError::NoActiveRun)?,
	};

	let entries = ctx.data().runs.list_entries(&run.name)?;
	if entries.is_empty() {
		ctx.reply(&format!("No Pokémon found for run '{}'.", run.name))
			.await?;
		return Ok(());
	}

	let mut response = format!("Pokémon for run '{}':", run.name);
	for entry in &entries {
		write!(response, "\n{entry}")?;
	}

	let total: i64 = entries.iter().map(|e| e.points).sum();
	let alive: i64 = entries
		.iter()
		.filter(|e| e.is_alive())
		.map(|e| e.points)
		.sum();
	write!(response, "\nTotal points: {total} (alive: {alive})")?;

	ctx.reply(&response).await?;
	Ok(())
}

/// Show the pokémon captured during a run
#[poise::command(prefix_command, slash_command)]
async fn view(
	mut ctx: PoiseContext<'_>,
	#[description = "Name of the run (defaults to the active one)"] name: Option<String>,
) -> Result<(), Error> {
	let res = execute(&mut ctx, Command::ViewRun { name }).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Tests
#[cfg(test)]
mod run_tests {
	use super::*;
	use crate::commands::router::execute_text;
	use crate::context::testing::get_mock_context;
	use crate::nuzlocke::entry::{NewEntry, Status};

	#[tokio::test]
	async fn add_then_list() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;
		list_impl(&mut ctx).await.map_err(|e| e.error)?;
		assert_eq!(ctx.last_message(), Some("No runs found."));

		add_impl(&mut ctx, "RedRun", "1").await.map_err(|e| e.error)?;
		add_impl(&mut ctx, "GoldRun", "2").await.map_err(|e| e.error)?;
		select_impl(&mut ctx, "GoldRun").await.map_err(|e| e.error)?;
		list_impl(&mut ctx).await.map_err(|e| e.error)?;

		assert_eq!(
			ctx.messages,
			vec![
				"No runs found.",
				"Run 'RedRun' for generation '1' added.",
				"Run 'GoldRun' for generation '2' added.",
				"Run 'GoldRun' selected.",
				"Available runs:\nName: RedRun, Generation: 1\nName: GoldRun, Generation: 2 (active)",
			]
		);
		Ok(())
	}

	#[tokio::test]
	async fn duplicate_run_is_reported() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;
		execute_text(&mut ctx, "run add RedRun 1").await?;
		execute_text(&mut ctx, "run add RedRun 3").await?;

		assert_eq!(
			ctx.last_message(),
			Some("A run named 'RedRun' already exists")
		);
		assert_eq!(ctx.data().runs.get_run("RedRun")?.generation, "1");
		Ok(())
	}

	#[tokio::test]
	async fn view_without_selection_needs_active_run() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;
		let res = view_impl(&mut ctx, None).await;
		assert!(matches!(
			res.map_err(|e| e.error.downcast::<TrackerError>()),
			Err(Ok(TrackerError::NoActiveRun))
		));
		Ok(())
	}

	#[tokio::test]
	async fn view_empty_run() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;
		ctx.data().runs.add_run("RedRun", "1")?;
		view_impl(&mut ctx, Some("RedRun")).await.map_err(|e| e.error)?;

		assert_eq!(ctx.last_message(), Some("No Pokémon found for run 'RedRun'."));
		Ok(())
	}

	#[tokio::test]
	async fn delete_follows_entry_policy() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;
		let runs = ctx.data().runs.clone();
		runs.add_run("RedRun", "1")?;
		runs.add_run("BlueRun", "1")?;
		runs.add_captured_entry(
			"RedRun",
			NewEntry {
				name: "Pidgey".to_owned(),
				form: None,
				route: "Route 1".to_owned(),
				base_stat_total: 251,
				points: 1,
			},
		)?;

		execute_text(&mut ctx, "run delete RedRun").await?;
		assert_eq!(
			ctx.last_message(),
			Some("Run 'RedRun' still has 1 captured pokémon and cannot be deleted")
		);
		assert_eq!(runs.list_entries("RedRun")?[0].status, Status::Alive);

		execute_text(&mut ctx, "run delete BlueRun").await?;
		assert_eq!(ctx.last_message(), Some("Run 'BlueRun' deleted."));
		assert_eq!(runs.list_runs()?.len(), 1);
		Ok(())
	}
}
// }}}
