use std::{
    io::{self, BufRead, IsTerminal, Write},
    process::ExitCode,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weather_core::{Config, PlainFileWeatherStorage, provider_from_config};

use crate::lookup::lookup;

/// Top-level CLI struct.
///
/// Without a subcommand, asks for a city and country code and shows the
/// current weather there.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Some(Command::Configure) => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            None => show().await,
        }
    }
}

async fn show() -> anyhow::Result<ExitCode> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    let storage = PlainFileWeatherStorage::new(config.history_path()?);

    let city = prompt_line("Enter city name:")?;
    let country_code = prompt_line("Enter ISO 3166-1 country code, e.g. \"ru\":")?;

    let mut stdout = io::stdout().lock();
    let outcome = lookup(provider.as_ref(), &storage, &city, &country_code, &mut stdout).await?;

    Ok(outcome.exit_code())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;

    config.api_key = Some(api_key.trim().to_string());
    let path = config.save()?;

    println!("Configuration saved to {}", path.display());
    Ok(())
}

/// Interactive prompt on a terminal, plain line read when stdin is piped.
fn prompt_line(message: &str) -> anyhow::Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(Text::new(message).prompt()?);
    }

    let mut stdout = io::stdout();
    write!(stdout, "{message} ")?;
    stdout.flush()?;

    let mut line = String::new();
    stdin.lock().read_line(&mut line).context("Failed to read from stdin")?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
