//! CLI definition using clap

use std::path::PathBuf;

use carbook_types::{parse_date, OutputFormat};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "carbook")]
#[command(version)]
#[command(about = "Track vehicles and the maintenance due at upcoming mileages")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Directory holding the vehicle data. Uses config value if not specified.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Accept blank or `YYYY-MM-DD`
fn date_arg(s: &str) -> Result<String, String> {
    if s.trim().is_empty() || parse_date(s).is_some() {
        Ok(s.to_string())
    } else {
        Err(format!("expected a date like 2024-05-29, got {:?}", s))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Vehicles(VehicleCommand),

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set data directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Subcommands that work on the vehicle store
#[derive(Subcommand)]
pub enum VehicleCommand {
    /// Add a vehicle (needs at least a make or a model)
    AddVehicle {
        #[arg(long, default_value = "")]
        make: String,

        #[arg(long, default_value = "")]
        model: String,

        #[arg(long, default_value = "")]
        year: String,

        #[arg(long, default_value = "")]
        vin: String,

        /// Current odometer reading. Unparsable values are stored as 0.
        #[arg(long, short = 'm', default_value = "", allow_hyphen_values = true)]
        mileage: String,
    },

    /// List vehicles, newest first
    List,

    /// Show a vehicle and its maintenance schedule
    Show {
        /// Vehicle id or unique id prefix
        vehicle: String,
    },

    /// Update a vehicle's odometer reading
    Mileage {
        /// Vehicle id or unique id prefix
        vehicle: String,

        /// New reading. Unparsable values are stored as 0.
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Remove a vehicle and all of its maintenance records
    RemoveVehicle {
        /// Vehicle id or unique id prefix
        vehicle: String,
    },

    /// Add a maintenance record (needs a type or a due mileage)
    AddMaintenance {
        /// Vehicle id or unique id prefix
        vehicle: String,

        /// Maintenance type (e.g., "Transmission Service")
        #[arg(long = "type", short = 't', default_value = "")]
        kind: String,

        /// Odometer value at which it becomes due
        #[arg(long, short = 'd', default_value = "", allow_hyphen_values = true)]
        due: String,

        /// Date last performed (YYYY-MM-DD)
        #[arg(long, default_value = "", value_parser = date_arg)]
        last_done: String,

        #[arg(long, short = 'n', default_value = "")]
        notes: String,
    },

    /// Add a preset maintenance item due one interval from current mileage
    Preset {
        /// Vehicle id or unique id prefix
        vehicle: String,

        /// Preset name (e.g., "Oil Change", "tire-rotation")
        preset: String,
    },

    /// Remove a maintenance record from a vehicle
    RemoveMaintenance {
        /// Vehicle id or unique id prefix
        vehicle: String,

        /// Record id or unique id prefix
        record: String,
    },

    /// List the preset catalog
    Presets,

    /// Report overdue and due-soon maintenance across all vehicles
    Due,

    /// Export vehicles and maintenance schedules to Excel
    Export {
        /// Output Excel file path
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Import data exported from the browser version of the car manager
    Import {
        /// Path to the exported JSON file
        file: PathBuf,

        /// Replace all existing vehicles instead of appending
        #[arg(long)]
        refresh: bool,

        /// Dry run - show what would be imported without actually importing
        #[arg(long)]
        dry_run: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_mileage_is_accepted_as_value() {
        let cli = Cli::try_parse_from(["carbook", "mileage", "abcd", "-5"]).unwrap();
        match cli.command {
            Commands::Vehicles(VehicleCommand::Mileage { vehicle, value }) => {
                assert_eq!(vehicle, "abcd");
                assert_eq!(value, "-5");
            }
            _ => panic!("expected mileage command"),
        }
    }

    #[test]
    fn test_last_done_is_validated() {
        assert!(Cli::try_parse_from([
            "carbook",
            "add-maintenance",
            "abcd",
            "--type",
            "Oil",
            "--last-done",
            "yesterday",
        ])
        .is_err());

        let cli = Cli::try_parse_from([
            "carbook",
            "add-maintenance",
            "abcd",
            "--due",
            "45000",
            "--last-done",
            "2024-05-29",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Vehicles(VehicleCommand::AddMaintenance { .. })
        ));
    }

    #[test]
    fn test_config_is_not_a_vehicle_command() {
        let cli = Cli::try_parse_from(["carbook", "config", "--show"]).unwrap();
        assert!(matches!(cli.command, Commands::Config { show: true, .. }));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["carbook", "list", "--format", "json", "-v"]).unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(cli.verbose);
    }
}
