//! Walks through a Steam sign-in: print the redirect, then verify the callback URL Steam sent
//! the browser back to and load the player's profile.
//!
//! ```sh
//! STEAM_API_KEY=... STEAM_CALLBACK_URL=http://localhost:3000/api/auth/callback/steam \
//! 	cargo run --example sign_in -- '<callback URL with openid.* parameters>'
//! ```

// std
use std::env;
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use steam_openid::{
	flows::SteamProvider,
	provider::{ProviderAdapter, ProviderDescriptorBuilder},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let descriptor = ProviderDescriptorBuilder::from_lookup(|key| env::var(key).ok())?.build()?;
	let provider = SteamProvider::new(descriptor);

	println!("Send your user to {}.", provider.authorization().url());

	let Some(callback) = env::args().nth(1) else {
		println!("Re-run with the callback URL to finish the sign-in.");

		return Ok(());
	};
	let credential = provider.token(&callback).await?;

	println!("Verified Steam ID {} ({} token issued).", credential.steam_id, credential.token_type);

	let profile = provider
		.userinfo(&credential)
		.await?
		.ok_or_else(|| eyre!("Steam returned no player for {}.", credential.steam_id))?;

	println!(
		"Signed in as {} ({}).",
		profile.persona_name.as_deref().unwrap_or("<unnamed>"),
		profile.profile_url.as_deref().unwrap_or("no profile URL"),
	);

	Ok(())
}
