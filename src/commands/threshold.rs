// {{{ Imports
use std::fmt::Write;

use crate::context::{Error, PoiseContext, TaggedError};

use super::discord::MessageContext;
use super::router::{execute, Command};
// }}}

// {{{ Toplevel
/// View or change how many points a base stat total is worth
#[poise::command(
	prefix_command,
	slash_command,
	subcommands("view", "set", "remove", "reset"),
	subcommand_required
)]
pub async fn threshold(_ctx: PoiseContext<'_>) -> Result<(), Error> {
	Ok(())
}
// }}}
// {{{ View
pub async fn view_impl(ctx: &mut impl MessageContext) -> Result<(), TaggedError> {
	let mut response = String::from("Current thresholds:");
	for entry in ctx.data().thresholds.list_thresholds()? {
		write!(response, "\n{entry}")?;
	}

	ctx.reply(&response).await?;
	Ok(())
}

/// Show the current thresholds
#[poise::command(prefix_command, slash_command)]
async fn view(mut ctx: PoiseContext<'_>) -> Result<(), Error> {
	let res = execute(&mut ctx, Command::ViewThresholds).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Set
pub async fn set_impl(
	ctx: &mut impl MessageContext,
	upper_bound: i64,
	points: i64,
) -> Result<(), TaggedError> {
	ctx.data().thresholds.set_threshold(upper_bound, points)?;
	ctx.reply(&format!(
		"Threshold updated: {upper_bound} BST = {points} points."
	))
	.await?;
	Ok(())
}

/// Set the points given to pokémon with a base stat total of at most `max_bst`
#[poise::command(prefix_command, slash_command)]
async fn set(
	mut ctx: PoiseContext<'_>,
	#[description = "Largest base stat total in this tier"] max_bst: i64,
	#[description = "Points given for this tier"] points: i64,
) -> Result<(), Error> {
	let res = execute(
		&mut ctx,
		Command::SetThreshold {
			upper_bound: max_bst,
			points,
		},
	)
	.await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Remove
pub async fn remove_impl(ctx: &mut impl MessageContext, upper_bound: i64) -> Result<(), TaggedError> {
	let removed = ctx.data().thresholds.remove_threshold(upper_bound)?;
	ctx.reply(&format!("Threshold removed: {removed}.")).await?;
	Ok(())
}

/// Remove a tier
#[poise::command(prefix_command, slash_command)]
async fn remove(
	mut ctx: PoiseContext<'_>,
	#[description = "Largest base stat total of the tier"] max_bst: i64,
) -> Result<(), Error> {
	let res = execute(
		&mut ctx,
		Command::RemoveThreshold {
			upper_bound: max_bst,
		},
	)
	.await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Reset
pub async fn reset_impl(ctx: &mut impl MessageContext) -> Result<(), TaggedError> {
	ctx.data().thresholds.reset_thresholds()?;
	ctx.reply("Thresholds reset to defaults.").await?;
	Ok(())
}

/// Go back to the default tiers
#[poise::command(prefix_command, slash_command)]
async fn reset(mut ctx: PoiseContext<'_>) -> Result<(), Error> {
	let res = execute(&mut ctx, Command::ResetThresholds).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Tests
#[cfg(test)]
mod threshold_command_tests {
	use super::*;
	use crate::commands::router::execute_text;
	use crate::context::testing::get_mock_context;

	#[tokio::test]
	async fn view_lists_defaults() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;
		view_impl(&mut ctx).await.map_err(|e| e.error)?;

		assert_eq!(
			ctx.last_message(),
			Some(
				"Current thresholds:\n\
				350 BST = 1 points\n\
				465 BST = 2 points\n\
				515 BST = 3 points\n\
				579 BST = 4 points\n\
				9999 BST = 5 points"
			)
		);
		Ok(())
	}

	#[tokio::test]
	async fn set_affects_later_captures() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;
		for line in [
			"run add BlackRun 5",
			"run select BlackRun",
			"threshold set 300 0",
			"add Tepig Route-1",
			"add Lillipup Route-1",
		] {
			execute_text(&mut ctx, line).await?;
		}

		let points: Vec<_> = ctx
			.data()
			.runs
			.list_entries("BlackRun")?
			.iter()
			.map(|e| e.points)
			.collect();
		assert_eq!(points, vec![1, 0]);
		Ok(())
	}

	#[tokio::test]
	async fn remove_and_reset() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;

		execute_text(&mut ctx, "threshold remove 465").await?;
		assert_eq!(
			ctx.last_message(),
			Some("Threshold removed: 465 BST = 2 points.")
		);
		assert_eq!(ctx.data().thresholds.classify(400)?, 3);

		execute_text(&mut ctx, "threshold remove 465").await?;
		assert_eq!(ctx.last_message(), Some("No threshold with upper bound 465"));

		execute_text(&mut ctx, "threshold reset").await?;
		assert_eq!(ctx.data().thresholds.classify(400)?, 2);
		Ok(())
	}
}
// }}}
