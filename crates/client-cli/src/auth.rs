//! CLI authentication commands - login, signup, logout, whoami

use anyhow::Result;
use dialoguer::{Input, Password};

use crate::session::{Session, SessionState};

/// Interactive login: prompt for credentials, establish a session, and
/// persist the token for subsequent runs.
pub async fn login(session: &mut Session, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password = Password::new().with_prompt("Password").interact()?;

    match session.login(&email, &password).await {
        Ok(user) => {
            println!("\x1b[1;32m✅ Login successful!\x1b[0m");
            println!("\x1b[90mLogged in as {} <{}>\x1b[0m", user.name, user.email);
            println!("Run '\x1b[1mlipi\x1b[0m' to open the chat surface.");
            Ok(())
        }
        Err(err) => {
            eprintln!("\x1b[31m❌ Login failed: {err}\x1b[0m");
            Err(err.into())
        }
    }
}

/// Interactive account creation; authenticates like a login on success.
pub async fn signup(session: &mut Session) -> Result<()> {
    let name: String = Input::new().with_prompt("Name").interact_text()?;
    let email: String = Input::new().with_prompt("Email").interact_text()?;
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    match session.signup(&name, &email, &password).await {
        Ok(user) => {
            println!("\x1b[1;32m✅ Account created!\x1b[0m");
            println!("\x1b[90mLogged in as {} <{}>\x1b[0m", user.name, user.email);
            Ok(())
        }
        Err(err) => {
            eprintln!("\x1b[31m❌ Signup failed: {err}\x1b[0m");
            Err(err.into())
        }
    }
}

/// Logout: best-effort remote invalidation, unconditional local cleanup.
pub async fn logout(session: &mut Session) -> Result<()> {
    session.logout().await;
    println!("\x1b[32m✅ Logged out successfully\x1b[0m");
    Ok(())
}

/// Show the identity behind the stored token.
pub async fn whoami(session: &mut Session) -> Result<()> {
    session.initialize().await;
    match session.state() {
        SessionState::Authenticated(user) => {
            println!("\x1b[32m✓ Logged in\x1b[0m");
            println!("Name:  {}", user.name);
            println!("Email: {}", user.email);
            println!("Role:  {}", user.role);
        }
        _ => {
            println!("\x1b[33m✗ Not logged in\x1b[0m");
            println!("Run '\x1b[1mlipi login\x1b[0m' to authenticate");
        }
    }
    Ok(())
}
