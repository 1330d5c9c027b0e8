use nuzbot::commands::discord::MessageContext;
use nuzbot::context::{Error, UserContext};

/// Similar in scope to [nuzbot::commands::discord::mock::MockContext],
/// except replies are printed to the standard output.
pub struct CliContext {
	pub user_id: u64,
	pub data: UserContext,
}

impl CliContext {
	pub fn new(data: UserContext) -> Self {
		Self { data, user_id: 0 }
	}
}

impl MessageContext for CliContext {
	fn author_id(&self) -> u64 {
		self.user_id
	}

	fn data(&self) -> &UserContext {
		&self.data
	}

	async fn reply(&mut self, text: &str) -> Result<(), Error> {
		println!("{text}");
		Ok(())
	}
}
