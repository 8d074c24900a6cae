//! Profile management commands

use console::style;
use dash0_api::config::DEFAULT_DATASET;
use dash0_api::{CliConfig, Connection, ConnectionFlags, Profile};

use crate::display;
use crate::error::Result;

/// Create a profile from the connection flags
pub fn create(name: &str, flags: &ConnectionFlags) -> Result<()> {
    let mut config = CliConfig::load()?;
    create_in(&mut config, name, flags)?;
    config.save()?;

    display::success(format!("Profile \"{}\" created", name));
    if config.active_profile.as_deref() == Some(name) {
        println!("  {} it is now the active profile", style("→").dim());
    }
    Ok(())
}

fn create_in(config: &mut CliConfig, name: &str, flags: &ConnectionFlags) -> Result<()> {
    let profile = Profile {
        name: name.to_string(),
        api_url: flags.api_url.clone(),
        auth_token: flags.auth_token.clone(),
        dataset: flags.dataset.clone(),
    };
    if profile.api_url.is_none() || profile.auth_token.is_none() {
        display::warning(format!(
            "profile \"{}\" has no API URL or auth token; commands will need them from flags or the environment",
            name
        ));
    }
    config.add(profile)?;
    Ok(())
}

pub fn list() -> Result<()> {
    let config = CliConfig::load()?;
    if config.profiles.is_empty() {
        println!("{}", style("No profiles configured").dim());
        return Ok(());
    }

    for profile in &config.profiles {
        let active = config.active_profile.as_deref() == Some(profile.name.as_str());
        let marker = if active { "*" } else { " " };
        println!(
            "{} {:<20} {}",
            style(marker).green().bold(),
            profile.name,
            profile.api_url.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

pub fn select(name: &str) -> Result<()> {
    let mut config = CliConfig::load()?;
    config.select(name)?;
    config.save()?;
    display::success(format!("Switched to profile \"{}\"", name));
    Ok(())
}

/// Print the connection that commands would use, with the token masked
pub fn show(name: Option<&str>, flags: &ConnectionFlags) -> Result<()> {
    let config = CliConfig::load()?;
    let mut flags = flags.clone();
    if let Some(name) = name {
        flags.profile = Some(name.to_string());
    }
    let connection = Connection::resolve(&config, &flags)?;

    let profile = flags
        .profile
        .as_deref()
        .or(config.active_profile.as_deref())
        .unwrap_or("-");
    println!("{:<10} {}", style("Profile:").bold(), profile);
    println!("{:<10} {}", style("API URL:").bold(), connection.api_url);
    println!("{:<10} {}", style("Token:").bold(), connection.masked_token());
    println!(
        "{:<10} {}",
        style("Dataset:").bold(),
        connection.dataset.as_deref().unwrap_or(DEFAULT_DATASET)
    );
    Ok(())
}

pub fn delete(name: &str) -> Result<()> {
    let mut config = CliConfig::load()?;
    let was_active = config.active_profile.as_deref() == Some(name);
    config.remove(name)?;
    config.save()?;

    display::success(format!("Profile \"{}\" deleted", name));
    if was_active {
        display::warning("no profile is active; select one with 'dash0 config profiles select'");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes;

    fn flags(url: &str, token: &str) -> ConnectionFlags {
        ConnectionFlags {
            api_url: Some(url.to_string()),
            auth_token: Some(token.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_first_profile_becomes_active() {
        let mut config = CliConfig::default();
        create_in(&mut config, "prod", &flags("https://api.example.com", "auth_1234")).unwrap();

        assert_eq!(config.active_profile.as_deref(), Some("prod"));
        assert_eq!(
            config.get("prod").unwrap().api_url.as_deref(),
            Some("https://api.example.com")
        );
    }

    #[test]
    fn test_create_duplicate_is_config_error() {
        let mut config = CliConfig::default();
        create_in(&mut config, "prod", &flags("https://a", "t")).unwrap();
        let err = create_in(&mut config, "prod", &flags("https://b", "t")).unwrap_err();

        assert_eq!(err.exit_code(), exit_codes::ERROR);
        assert_eq!(config.profiles.len(), 1);
    }
}
