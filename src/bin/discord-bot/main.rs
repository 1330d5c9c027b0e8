use nuzbot::commands;
use nuzbot::context::config::ProviderConfig;
use nuzbot::context::paths::{get_var, NuzPaths};
use nuzbot::context::{Error, UserContext};
use nuzbot::logs;
use poise::serenity_prelude::{self as serenity};
use std::{sync::Arc, time::Duration};
use tracing::{error, info};

// {{{ Error handler
async fn on_error(error: poise::FrameworkError<'_, UserContext, Error>) {
	if let Err(e) = poise::builtins::on_error(error).await {
		error!("Error while handling error: {}", e)
	}
}
// }}}

#[tokio::main]
async fn main() -> Result<(), Error> {
	logs::init();

	// {{{ Poise options
	let options = poise::FrameworkOptions {
		commands: vec![
			commands::help(),
			commands::run::run(),
			commands::capture::add(),
			commands::capture::status(),
			commands::threshold::threshold(),
		],
		prefix_options: poise::PrefixFrameworkOptions {
			prefix: Some("!".into()),
			edit_tracker: Some(Arc::new(poise::EditTracker::for_timespan(
				Duration::from_secs(3600),
			))),
			..Default::default()
		},
		on_error: |error| Box::pin(on_error(error)),
		..Default::default()
	};
	// }}}
	// {{{ Start poise
	let framework = poise::Framework::builder()
		.setup(move |ctx, ready, framework| {
			Box::pin(async move {
				info!("Logged in as {}", ready.user.name);
				poise::builtins::register_globally(ctx, &framework.options().commands).await?;
				let ctx = UserContext::new(NuzPaths::new()?, &ProviderConfig::from_env()?)?;
				Ok(ctx)
			})
		})
		.options(options)
		.build();

	let token = get_var("NUZBOT_DISCORD_TOKEN")?;
	let intents =
		serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

	let mut client = serenity::ClientBuilder::new(token, intents)
		.framework(framework)
		.await?;

	client.start().await?;
	Ok(())
	// }}}
}
