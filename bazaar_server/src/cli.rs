use std::{env, env::VarError};

use bazaar_engine::db_types::UserType;

use crate::{auth::TokenIssuer, config::AuthConfig};

/// What `main` should do after the command line has been looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliOutcome {
    RunServer,
    Exit,
}

/// There's no real CLI for the server, so just do quick 'n dirty.
///
/// `issue-token <user_id> <buyer|seller>` prints a development access token. Any other arguments print the help text
/// and the current configuration.
pub fn handle_command_line_args() -> CliOutcome {
    let args = env::args().skip(1).collect::<Vec<String>>();
    match args.first().map(String::as_str) {
        None => CliOutcome::RunServer,
        Some("issue-token") => {
            match issue_token(&args[1..]) {
                Ok(token) => println!("{token}"),
                Err(e) => {
                    eprintln!("{e}");
                    eprintln!("Usage: bazaar_server issue-token <user_id> <buyer|seller>");
                },
            }
            CliOutcome::Exit
        },
        Some(_) => {
            display_readme();
            display_envs();
            CliOutcome::Exit
        },
    }
}

fn issue_token(args: &[String]) -> Result<String, String> {
    let [user_id, user_type] = args else {
        return Err("Expected exactly two arguments".to_string());
    };
    let user_id = user_id.parse::<i64>().map_err(|e| format!("Invalid user id '{user_id}'. {e}"))?;
    let user_type = user_type.parse::<UserType>().map_err(|e| e.to_string())?;
    let config = AuthConfig::try_from_env().map_err(|e| format!("Set BZR_JWT_SECRET to issue tokens. {e}"))?;
    TokenIssuer::new(&config).issue_token(user_id, user_type).map_err(|e| e.to_string())
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 7] = [
        "RUST_LOG",
        "BZR_HOST",
        "BZR_PORT",
        "BZR_DATABASE_URL",
        "BZR_TOKEN_LIFETIME_HOURS",
        "BZR_UPLOAD_DIR",
        "BZR_EVENT_BUFFER_SIZE",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
