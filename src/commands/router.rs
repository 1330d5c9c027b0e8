//! Text commands and their dispatch.
//!
//! Every command the bot understands is a variant of [Command], carrying
//! its already validated arguments. Both the discord wrappers and the
//! cli go through [execute].

// {{{ Imports
use std::str::FromStr;

use thiserror::Error;

use crate::context::TaggedError;
use crate::nuzlocke::entry::Status;
use crate::nuzlocke::error::TrackerError;

use super::discord::MessageContext;
use super::{capture, run, threshold};
// }}}

// {{{ Command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	AddRun { name: String, generation: String },
	DeleteRun { name: String },
	SelectRun { name: String },
	ListRuns,
	/// Views the active run when no name is given.
	ViewRun { name: Option<String> },
	Capture {
		name: String,
		route: String,
		form: Option<String>,
	},
	SetStatus { name: String, status: Status },
	ViewThresholds,
	SetThreshold { upper_bound: i64, points: i64 },
	RemoveThreshold { upper_bound: i64 },
	ResetThresholds,
	Help,
}

pub const USAGE: &str = "\
Available commands:
`run add <name> <generation>`
`run delete <name>`
`run select <name>`
`run list`
`run view [name]`
`add <name> <route> [form]`
`status <name> <alive|dead>`
`threshold view`
`threshold set <max_bst> <points>`
`threshold remove <max_bst>`
`threshold reset`";
// }}}
// {{{ Parse errors
#[derive(Error, Debug)]
pub enum CommandError {
	#[error("Usage: `{0}`")]
	Usage(&'static str),

	#[error("Unknown command '{0}'. Use `help` to list every command")]
	UnknownCommand(String),

	#[error(transparent)]
	Invalid(#[from] TrackerError),
}

impl CommandError {
	#[inline]
	pub fn is_user_error(&self) -> bool {
		match self {
			Self::Invalid(err) => err.is_user_error(),
			_ => true,
		}
	}
}

fn parse_integer(word: &str) -> Result<i64, CommandError> {
	word.parse()
		.map_err(|_| TrackerError::InvalidThresholdInput(word.to_owned()).into())
}
// }}}
// {{{ Parsing
impl Command {
	/// Parses an already split command line. Parsing never looks at
	/// any state.
	pub fn parse_words(words: &[&str]) -> Result<Self, CommandError> {
		let command = match words {
			["help"] | [] => Self::Help,

			["run", "add", name, generation] => Self::AddRun {
				name: (*name).to_owned(),
				generation: (*generation).to_owned(),
			},
			["run", "add", ..] => return Err(CommandError::Usage("run add <name> <generation>")),
			["run", "delete", name] => Self::DeleteRun {
				name: (*name).to_owned(),
			},
			["run", "delete", ..] => return Err(CommandError::Usage("run delete <name>")),
			["run", "select", name] => Self::SelectRun {
				name: (*name).to_owned(),
			},
			["run", "select", ..] => return Err(CommandError::Usage("run select <name>")),
			["run", "list"] => Self::ListRuns,
			["run", "view"] => Self::ViewRun { name: None },
			["run", "view", name] => Self::ViewRun {
				name: Some((*name).to_owned()),
			},
			["run", ..] => {
				return Err(CommandError::Usage(
					"run <add|delete|select|list|view> [arguments]",
				))
			}

			["add", name, route] => Self::Capture {
				name: (*name).to_owned(),
				route: (*route).to_owned(),
				form: None,
			},
			["add", name, route, form] => Self::Capture {
				name: (*name).to_owned(),
				route: (*route).to_owned(),
				form: Some((*form).to_owned()),
			},
			["add", ..] => return Err(CommandError::Usage("add <name> <route> [form]")),

			["status", name, status] => Self::SetStatus {
				name: (*name).to_owned(),
				status: status.parse()?,
			},
			["status", ..] => return Err(CommandError::Usage("status <name> <alive|dead>")),

			["threshold", "view"] => Self::ViewThresholds,
			["threshold", "set", upper_bound, points] => Self::SetThreshold {
				upper_bound: parse_integer(upper_bound)?,
				points: parse_integer(points)?,
			},
			["threshold", "set", ..] => {
				return Err(CommandError::Usage("threshold set <max_bst> <points>"))
			}
			["threshold", "remove", upper_bound] => Self::RemoveThreshold {
				upper_bound: parse_integer(upper_bound)?,
			},
			["threshold", "remove", ..] => {
				return Err(CommandError::Usage("threshold remove <max_bst>"))
			}
			["threshold", "reset"] => Self::ResetThresholds,
			["threshold", ..] => {
				return Err(CommandError::Usage(
					"threshold <view|set|remove|reset> [arguments]",
				))
			}

			[other, ..] => return Err(CommandError::UnknownCommand((*other).to_owned())),
		};

		Ok(command)
	}
}

impl FromStr for Command {
	type Err = CommandError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let words = s.split_whitespace().collect::<Vec<_>>();
		Self::parse_words(&words)
	}
}
// }}}
// {{{ Dispatch
pub async fn execute(ctx: &mut impl MessageContext, command: Command) -> Result<(), TaggedError> {
	match command {
		Command::AddRun { name, generation } => run::add_impl(ctx, &name, &generation).await,
		Command::DeleteRun { name } => run::delete_impl(ctx, &name).await,
		Command::SelectRun { name } => run::select_impl(ctx, &name).await,
		Command::ListRuns => run::list_impl(ctx).await,
		Command::ViewRun { name } => run::view_impl(ctx, name.as_deref()).await,
		Command::Capture { name, route, form } => {
			capture::add_impl(ctx, name, route, form).await
		}
		Command::SetStatus { name, status } => capture::status_impl(ctx, &name, status).await,
		Command::ViewThresholds => threshold::view_impl(ctx).await,
		Command::SetThreshold {
			upper_bound,
			points,
		} => threshold::set_impl(ctx, upper_bound, points).await,
		Command::RemoveThreshold { upper_bound } => {
			threshold::remove_impl(ctx, upper_bound).await
		}
		Command::ResetThresholds => threshold::reset_impl(ctx).await,
		Command::Help => {
			ctx.reply(USAGE).await?;
			Ok(())
		}
	}
}

/// Parses and runs a command given as separate words, reporting every
/// failure back through the context. Returns whether the command succeeded.
pub async fn execute_words(
	ctx: &mut impl MessageContext,
	words: &[&str],
) -> Result<bool, crate::context::Error> {
	let res = match Command::parse_words(words) {
		Ok(command) => execute(ctx, command).await,
		Err(error) => Err(error.into()),
	};

	Ok(ctx.handle_error(res).await?.is_some())
}

/// Like [execute_words], for a single whitespace separated line of text.
#[cfg(test)]
pub async fn execute_text(
	ctx: &mut impl MessageContext,
	text: &str,
) -> Result<bool, crate::context::Error> {
	let words = text.split_whitespace().collect::<Vec<_>>();
	execute_words(ctx, &words).await
}
// }}}
// {{{ Tests
#[cfg(test)]
mod router_tests {
	use super::*;
	use crate::context::testing::get_mock_context;
	use crate::context::{Error, ErrorKind};

	fn parse(text: &str) -> Result<Command, CommandError> {
		text.parse()
	}

	#[test]
	fn parses_every_command() -> Result<(), CommandError> {
		assert_eq!(
			parse("run add RedRun 1")?,
			Command::AddRun {
				name: "RedRun".to_owned(),
				generation: "1".to_owned()
			}
		);
		assert_eq!(parse("run view")?, Command::ViewRun { name: None });
		assert_eq!(
			parse("add Vulpix Route-7 Alolan")?,
			Command::Capture {
				name: "Vulpix".to_owned(),
				route: "Route-7".to_owned(),
				form: Some("Alolan".to_owned())
			}
		);
		assert_eq!(
			parse("status Tepig DEAD")?,
			Command::SetStatus {
				name: "Tepig".to_owned(),
				status: Status::Dead
			}
		);
		assert_eq!(
			parse("threshold set 600 -1")?,
			Command::SetThreshold {
				upper_bound: 600,
				points: -1
			}
		);
		assert_eq!(parse("  threshold   reset ")?, Command::ResetThresholds);
		assert_eq!(parse("")?, Command::Help);
		Ok(())
	}

	#[test]
	fn rejects_malformed_commands() {
		assert!(matches!(parse("run add RedRun"), Err(CommandError::Usage(_))));
		assert!(matches!(parse("run rename a b"), Err(CommandError::Usage(_))));
		assert!(matches!(parse("add Tepig"), Err(CommandError::Usage(_))));
		assert!(matches!(parse("catch Tepig"), Err(CommandError::UnknownCommand(_))));
		assert!(matches!(
			parse("status Tepig fainted"),
			Err(CommandError::Invalid(TrackerError::InvalidStatus(_)))
		));
		assert!(matches!(
			parse("threshold set high 3"),
			Err(CommandError::Invalid(TrackerError::InvalidThresholdInput(_)))
		));
		assert!(matches!(
			parse("threshold set 300 3.5"),
			Err(CommandError::Invalid(TrackerError::InvalidThresholdInput(_)))
		));
	}

	#[test]
	fn parse_errors_are_user_errors() {
		let err: TaggedError = CommandError::Usage("run list").into();
		assert_eq!(err.kind, ErrorKind::User);

		let err: TaggedError = TrackerError::NoActiveRun.into();
		assert_eq!(err.kind, ErrorKind::User);

		let err: TaggedError =
			TrackerError::StorageUnavailable(anyhow::anyhow!("disk on fire")).into();
		assert_eq!(err.kind, ErrorKind::Internal);
	}

	#[tokio::test]
	async fn malformed_text_leaves_state_alone() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;
		let before = ctx.data().thresholds.list_thresholds()?;

		execute_text(&mut ctx, "threshold set lots 3").await?;
		execute_text(&mut ctx, "run add OnlyName").await?;

		assert_eq!(ctx.data().thresholds.list_thresholds()?, before);
		assert!(ctx.data().runs.list_runs()?.is_empty());
		assert_eq!(ctx.messages.len(), 2);
		assert!(ctx.messages[0].contains("must be integers"));
		assert!(ctx.messages[1].starts_with("Usage"));
		Ok(())
	}

	#[tokio::test]
	async fn words_report_success() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;

		assert!(execute_words(&mut ctx, &["run", "add", "RedRun", "1"]).await?);
		assert!(!execute_words(&mut ctx, &["run", "add", "RedRun", "2"]).await?);
		assert!(!execute_words(&mut ctx, &["frobnicate"]).await?);

		assert_eq!(ctx.messages.len(), 3);
		assert_eq!(
			ctx.last_message(),
			Some("Unknown command 'frobnicate'. Use `help` to list every command")
		);
		Ok(())
	}

	#[tokio::test]
	async fn full_session() -> Result<(), Error> {
		let (mut ctx, _guard) = get_mock_context()?;

		for line in [
			"run add BlackRun 5",
			"run select BlackRun",
			"add Tepig Nuvema-Town",
			"add Garchomp Route-1",
			"status tepig dead",
			"run view",
		] {
			execute_text(&mut ctx, line).await?;
		}

		assert_eq!(
			ctx.last_message(),
			Some(
				"Pokémon for run 'BlackRun':\n\
				Name: Tepig, Route: Nuvema-Town, BST: 308, Points: 1, Status: Dead\n\
				Name: Garchomp, Route: Route-1, BST: 600, Points: 5, Status: Alive\n\
				Total points: 6 (alive: 5)"
			)
		);
		Ok(())
	}
}
// }}}
