use std::io::{self, Write};

use crate::config::{validate_url, Config, DEFAULT_API_URL};
use crate::error::Result;
use crate::lifecycle::AssignPolicy;

fn prompt(question: &str) -> Result<String> {
    print!("{question}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists() {
        let answer = prompt(&format!(
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        ))?;
        if !answer.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Bugtrack CLI Configuration");
    println!("==========================\n");

    let api_url = prompt(&format!("API base URL [{DEFAULT_API_URL}]: "))?;
    let lock = prompt("Keep approved bugs from being reassigned? [y/N] ")?;

    let api_url = if api_url.is_empty() {
        None
    } else {
        Some(validate_url(&api_url)?)
    };

    let config = Config {
        api_url,
        assign_policy: if lock.eq_ignore_ascii_case("y") {
            AssignPolicy::UntilApproved
        } else {
            AssignPolicy::AnyStatus
        },
    };
    config.save_to(&config_path)?;

    println!("\nConfig saved to {}", config_path.display());
    println!("Next: bugtrack login -u <username> --role <role>");

    Ok(())
}
