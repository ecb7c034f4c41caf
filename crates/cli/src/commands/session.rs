//! Session commands.

use secrecy::SecretString;
use tracing::info;

use vitrine_client::{EngineError, Storefront};

/// Sign in and pull the remote favorites list.
pub async fn login(
    shop: &mut Storefront,
    email: &str,
    password: SecretString,
) -> Result<(), EngineError> {
    let user = shop.login(email, password).await?;
    info!("Signed in as {} ({})", user.name, user.email);
    info!(
        "{} favorite(s) loaded, {} item(s) in cart",
        shop.favorite_count(),
        shop.cart_count(),
    );
    Ok(())
}

/// Create an account and sign in.
pub async fn register(
    shop: &mut Storefront,
    email: &str,
    password: SecretString,
    name: &str,
) -> Result<(), EngineError> {
    let user = shop.register(email, password, name).await?;
    info!("Account created, signed in as {} ({})", user.name, user.email);
    Ok(())
}

/// Sign out. The cart stays on this machine.
pub fn logout(shop: &mut Storefront) {
    shop.logout();
    info!(
        "Signed out. Cart kept locally ({} item(s)).",
        shop.cart_count()
    );
}

/// Print the current session.
#[allow(clippy::print_stdout)]
pub fn whoami(shop: &Storefront) {
    match shop.session() {
        Some(user) => println!("{} ({})", user.name, user.email),
        None => println!("Not signed in."),
    }
}
