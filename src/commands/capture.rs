// {{{ Imports
use crate::context::{Error, PoiseContext, TaggedError};
use crate::nuzlocke::capture::{capture, CaptureRequest};
use crate::nuzlocke::entry::Status;

use super::discord::MessageContext;
use super::router::{execute, Command};
// }}}

// {{{ Add
pub async fn add_impl(
	ctx: &mut impl MessageContext,
	name: String,
	route: String,
	form: Option<String>,
) -> Result<(), TaggedError> {
	let captured = capture(ctx.data(), CaptureRequest { name, route, form }).await?;
	let entry = &captured.entry;

	let types = if captured.record.types.is_empty() {
		String::new()
	} else {
		format!(" [{}]", captured.record.types.join("/"))
	};

	ctx.reply(&format!(
		"Added {}{} (Route: {}, BST: {}, Points: {}) to run '{}'.",
		entry.name, types, entry.route, entry.base_stat_total, entry.points, captured.run.name
	))
	.await?;

	Ok(())
}

/// Add a pokémon to the active run
#[poise::command(prefix_command, slash_command, user_cooldown = 1)]
pub async fn add(
	mut ctx: PoiseContext<'_>,
	#[description = "Name of the pokémon"] name: String,
	#[description = "Route where the pokémon was caught"] route: String,
	#[description = "Regional or alternate form"] form: Option<String>,
) -> Result<(), Error> {
	ctx.defer().await?;
	let res = execute(&mut ctx, Command::Capture { name, route, form }).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Status
pub async fn status_impl(
	ctx: &mut impl MessageContext,
	name: &str,
	status: Status,
) -> Result<(), TaggedError> {
	let run = ctx.data().runs.require_active_run()?;
	ctx.data().runs.update_status(name, &run.name, status)?;

	ctx.reply(&format!("Updated status of {name} to {status}."))
		.await?;
	Ok(())
}

/// Mark a pokémon of the active run as alive or dead
#[poise::command(prefix_command, slash_command)]
pub async fn status(
	mut ctx: PoiseContext<'_>,
	#[description = "Name of the pokémon"] name: String,
	#[description = "The new status"] status: Status,
) -> Result<(), Error> {
	let res = execute(&mut ctx, Command::SetStatus { name, status }).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
