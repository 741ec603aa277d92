use std::io::{self, Write};

use serde::Serialize;

use crate::cli::LoginArgs;
use crate::error::{BugtrackError, Result};
use crate::output;
use crate::session::Session;
use crate::types::Role;

const TOKEN_ENV: &str = "BUGTRACK_TOKEN";

fn resolve_token(explicit: Option<String>) -> Result<String> {
    if let Some(token) = explicit.or_else(|| std::env::var(TOKEN_ENV).ok()) {
        return non_empty(token);
    }

    print!("Enter your API token: ");
    io::stdout().flush()?;
    let mut token = String::new();
    io::stdin().read_line(&mut token)?;
    non_empty(token)
}

fn non_empty(token: String) -> Result<String> {
    let token = token.trim();
    if token.is_empty() {
        Err(BugtrackError::MissingToken)
    } else {
        Ok(token.to_string())
    }
}

pub fn login(args: LoginArgs) -> Result<()> {
    let session = Session {
        username: args.username,
        role: args.role,
        token: resolve_token(args.token)?,
    };
    session.save_to(&Session::session_path()?)?;

    output::print_message(&format!(
        "Logged in as {} ({})",
        session.username, session.role
    ));
    Ok(())
}

pub fn logout() -> Result<()> {
    if Session::clear(&Session::session_path()?)? {
        output::print_message("Logged out.");
    } else {
        output::print_message("No active session.");
    }
    Ok(())
}

#[derive(Serialize)]
struct WhoAmI<'a> {
    username: &'a str,
    role: Role,
}

pub fn whoami(session: &Session) -> Result<()> {
    let who = WhoAmI {
        username: &session.username,
        role: session.role,
    };
    output::print_item(&who, |w| println!("{} ({})", w.username, w.role));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_token_is_trimmed() {
        assert_eq!(resolve_token(Some(" abc \n".to_string())).unwrap(), "abc");
    }

    #[test]
    fn test_blank_token_rejected() {
        assert!(matches!(
            non_empty("   ".to_string()),
            Err(BugtrackError::MissingToken)
        ));
    }
}
