//! Login, logout, registration and `whoami`

use zeroize::Zeroizing;

use crate::error::{RubikError, RubikResult};
use crate::models::Registration;
use crate::services::auth::{AuthService, SessionState};

/// Use the password given on the command line, or prompt for it without echo
fn read_password(given: Option<String>, prompt: &str) -> RubikResult<Zeroizing<String>> {
    match given {
        Some(password) => Ok(Zeroizing::new(password)),
        None => rpassword::prompt_password(prompt)
            .map(Zeroizing::new)
            .map_err(|e| RubikError::Io(format!("Failed to read password: {}", e))),
    }
}

pub async fn handle_login(
    auth: &AuthService,
    email: &str,
    password: Option<String>,
) -> RubikResult<()> {
    let password = read_password(password, "Password: ")?;
    let user = auth.login(email, &password).await?;
    println!("Logged in as {} <{}>", user.name, user.email);
    Ok(())
}

/// Always clears local state, including a token stored without a readable user
pub async fn handle_logout(auth: &AuthService) -> RubikResult<()> {
    let was_signed_in = auth.current().is_signed_in();
    auth.logout().await?;
    if was_signed_in {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub async fn handle_register(
    auth: &AuthService,
    name: String,
    email: String,
    password: Option<String>,
) -> RubikResult<()> {
    // With the password on the command line there is nothing to confirm
    let (password, confirm) = match password {
        Some(password) => {
            let password = Zeroizing::new(password);
            let confirm = password.clone();
            (password, confirm)
        }
        None => (
            read_password(None, "Password: ")?,
            read_password(None, "Confirm password: ")?,
        ),
    };

    let mut form = Registration {
        name,
        email,
        password: password.to_string(),
        confirm_password: confirm.to_string(),
    };
    let result = auth.register(&form).await;
    zeroize::Zeroize::zeroize(&mut form.password);
    zeroize::Zeroize::zeroize(&mut form.confirm_password);
    result?;

    println!("Account created for {}. Run 'rubik login' to sign in.", form.email);
    Ok(())
}

pub fn handle_whoami(auth: &AuthService) -> RubikResult<()> {
    match auth.current() {
        SessionState::SignedIn(user) => {
            println!("{} <{}>", user.name, user.email);
            Ok(())
        }
        SessionState::SignedOut => Err(RubikError::no_session()),
    }
}
