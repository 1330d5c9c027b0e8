use tracing::error;

use crate::context::{Error, ErrorKind, TaggedError, UserContext};

// {{{ Trait
pub trait MessageContext {
	/// Get the user context held by the message
	fn data(&self) -> &UserContext;
	fn author_id(&self) -> u64;

	/// Reply to the current message
	async fn reply(&mut self, text: &str) -> Result<(), Error>;

	/// Reports a failed command back to the invoker.
	///
	/// User errors are shown as they are. Internal errors get logged, and
	/// the invoker only gets told that something went wrong on our side.
	async fn handle_error<V>(&mut self, res: Result<V, TaggedError>) -> Result<Option<V>, Error> {
		match res {
			Ok(v) => Ok(Some(v)),
			Err(e) => {
				match e.kind {
					ErrorKind::User => {
						self.reply(&format!("{}", e.error)).await?;
					}
					ErrorKind::Internal => {
						error!(error = ?e.error, author = self.author_id(), "Command failed");
						self.reply(&format!("Something went wrong on my end: {}", e.error))
							.await?;
					}
				}

				Ok(None)
			}
		}
	}
}
// }}}
// {{{ Poise implementation
impl<'a> MessageContext for poise::Context<'a, UserContext, Error> {
	fn data(&self) -> &UserContext {
		Self::data(*self)
	}

	fn author_id(&self) -> u64 {
		self.author().id.get()
	}

	async fn reply(&mut self, text: &str) -> Result<(), Error> {
		Self::reply(*self, text).await?;
		Ok(())
	}
}
// }}}
// {{{ Testing context
pub mod mock {
	use super::*;

	/// Records every reply instead of sending it anywhere.
	pub struct MockContext {
		pub user_id: u64,
		pub data: UserContext,
		pub messages: Vec<String>,
	}

	impl MockContext {
		pub fn new(data: UserContext) -> Self {
			Self {
				data,
				user_id: 666,
				messages: vec![],
			}
		}

		/// The most recent reply, if any.
		pub fn last_message(&self) -> Option<&str> {
			self.messages.last().map(String::as_str)
		}
	}

	impl MessageContext for MockContext {
		fn author_id(&self) -> u64 {
			self.user_id
		}

		fn data(&self) -> &UserContext {
			&self.data
		}

		async fn reply(&mut self, text: &str) -> Result<(), Error> {
			self.messages.push(text.to_owned());
			Ok(())
		}
	}
}
// }}}
