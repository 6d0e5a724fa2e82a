use std::str::FromStr;

use anyhow::{anyhow, Result};
use clap::{Subcommand, ValueEnum};

use crate::state::{
    entities::{SettingsPatch, WorkType},
    persistence::StateStorage,
    store::Store,
};

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    #[command(about = "Print current settings")]
    Show {},
    #[command(about = "Change settings. Only the given values are updated")]
    Set {
        #[arg(long, help = "ISO 4217 currency code, e.g. BRL or USD")]
        currency: Option<String>,
        #[arg(long = "rate", help = "Base hourly rate")]
        hourly_rate: Option<f64>,
        #[arg(
            long = "multiplier",
            help = "Multiplier for a work type, e.g. --multiplier night=1.2. Can be repeated"
        )]
        multipliers: Vec<MultiplierArg>,
        #[arg(long)]
        dark_mode: Option<bool>,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct MultiplierArg {
    work_type: WorkType,
    value: f64,
}

impl FromStr for MultiplierArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected <type>=<value>, got {s}"))?;
        let work_type = WorkType::from_str(name.trim(), true).map_err(|e| anyhow!(e))?;
        let value = value.trim().parse::<f64>()?;
        Ok(Self { work_type, value })
    }
}

pub async fn process_settings_command<S: StateStorage>(
    store: &mut Store<S>,
    command: SettingsCommand,
) -> Result<()> {
    match command {
        SettingsCommand::Show {} => {}
        SettingsCommand::Set {
            currency,
            hourly_rate,
            multipliers,
            dark_mode,
        } => {
            store
                .update_settings(SettingsPatch {
                    currency: currency.map(|v| v.to_uppercase()),
                    hourly_rate,
                    multipliers: multipliers
                        .into_iter()
                        .map(|m| (m.work_type, m.value))
                        .collect(),
                    dark_mode,
                })
                .await?;
        }
    }

    let settings = &store.state().settings;
    println!("currency\t{}", settings.currency);
    println!("hourly rate\t{}", settings.hourly_rate);
    for work_type in WorkType::ALL {
        println!("{work_type}\tx{}", settings.multipliers.get(work_type));
    }
    println!("dark mode\t{}", settings.dark_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::state::entities::WorkType;

    use super::MultiplierArg;

    #[test]
    fn test_parse_multiplier() {
        let arg = MultiplierArg::from_str("Night=1.25").unwrap();
        assert_eq!(arg.work_type, WorkType::Night);
        assert_eq!(arg.value, 1.25);

        assert!(MultiplierArg::from_str("night").is_err());
        assert!(MultiplierArg::from_str("weekend=2").is_err());
        assert!(MultiplierArg::from_str("extra=lots").is_err());
    }
}
