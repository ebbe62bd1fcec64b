//! Login, logout and whoami

use std::io::{self, BufRead, Write};
use std::time::Duration;

use zeroize::Zeroizing;

use crate::api::HttpTransport;
use crate::config::{CabinetPaths, Settings};
use crate::error::{CabinetError, CabinetResult};
use crate::services::SessionService;

fn prompt_email() -> CabinetResult<String> {
    print!("Email: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub fn handle_login(
    paths: &CabinetPaths,
    settings: &Settings,
    email: Option<String>,
) -> CabinetResult<()> {
    let email = match email {
        Some(email) => email,
        None => prompt_email()?,
    };
    let password = Zeroizing::new(
        rpassword::prompt_password("Password: ")
            .map_err(|e| CabinetError::Auth(format!("Could not read password: {}", e)))?,
    );

    let transport = HttpTransport::new(Duration::from_secs(settings.request_timeout_secs))?;
    let session = SessionService::new(paths, settings, &transport).login(&email, &password)?;

    println!("Logged in as {}", session.email);
    println!("  Session valid until {}", session.expires_at.format("%Y-%m-%d %H:%M UTC"));
    Ok(())
}

pub fn handle_logout(paths: &CabinetPaths, settings: &Settings) -> CabinetResult<()> {
    let transport = HttpTransport::new(Duration::from_secs(settings.request_timeout_secs))?;
    if SessionService::new(paths, settings, &transport).logout()? {
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

pub fn handle_whoami(paths: &CabinetPaths, settings: &Settings) -> CabinetResult<()> {
    let transport = HttpTransport::new(Duration::from_secs(settings.request_timeout_secs))?;
    let session = SessionService::new(paths, settings, &transport)
        .current()?
        .ok_or(CabinetError::NotLoggedIn)?;

    println!("{}", session.email);
    println!("  User ID:  {}", session.user_id);
    if let Some(role) = session.claims().and_then(|c| c.role) {
        println!("  Role:     {}", role);
    }
    println!(
        "  Session:  {} ({})",
        if session.is_expired() { "expired" } else { "active" },
        session.expires_at.format("%Y-%m-%d %H:%M UTC")
    );
    Ok(())
}
