#![deny(unused_variables)]
#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(clippy::no_effect_underscore_binding)]

// ========================================================================================
//
//                      The Form Orchestrator: Cardioform
//
// ========================================================================================
//
// Renders the configured form in memory, attaches one synchronizer per categorical
// variable, replays the requested selections as change notifications, and emits the
// resulting hidden fields.

use cardioform::{
    CategoricalVariable, EncodedForm, FormConfig, FormController, FormDocument, UnmappedPolicy,
};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Tsv,
}

#[derive(Args)]
struct EncodeArgs {
    /// Form configuration TOML (defaults to the built-in heart disease form)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Fail when a selector holds a value that is not a known category
    #[arg(long)]
    strict: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write the encoded form to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Chest pain type (TA, ATA, NAP, ASY)
    #[arg(long, value_name = "VALUE")]
    chest_pain: Option<String>,

    /// Sex (M, F)
    #[arg(long, value_name = "VALUE")]
    sex: Option<String>,

    /// Exercise-induced angina (Y, N)
    #[arg(long, value_name = "VALUE")]
    exercise_angina: Option<String>,

    /// ST slope (Up, Flat, Down)
    #[arg(long, value_name = "VALUE")]
    st_slope: Option<String>,

    /// Resting ECG result (Normal, LVH, ST)
    #[arg(long, value_name = "VALUE")]
    resting_ecg: Option<String>,

    /// Set any selector by element id, applied after the named options
    #[arg(long = "select", value_name = "ID=VALUE", value_parser = parse_selection)]
    selections: Vec<(String, String)>,
}

#[derive(Parser)]
#[command(
    name = "cardioform",
    version,
    about = "One-hot encoding of categorical clinical form selections",
    long_about = "Keeps the hidden one-hot fields of a heart disease prediction form \
                 consistent with its categorical selectors."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a set of selections into hidden form fields
    #[command(about = "Encode selections into one-hot hidden fields")]
    Encode(EncodeArgs),

    /// Emit the built-in form configuration
    #[command(about = "Print the built-in configuration as TOML")]
    Config {
        /// Write the configuration to this file instead of stdout
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Validate a form configuration
    #[command(about = "Load and validate a configuration file")]
    Check {
        #[arg(long, value_name = "PATH")]
        config: PathBuf,
    },

    /// Display version information
    #[command(about = "Display version information")]
    Version,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let Cli { command } = cli;

    let result = match command {
        Some(Commands::Encode(args)) => run_encode(args),
        Some(Commands::Config { output }) => run_config(output),
        Some(Commands::Check { config }) => run_check(&config),
        Some(Commands::Version) => {
            println!("cardioform {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => {
            Cli::command().print_help().expect("print help");
            println!();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn parse_selection(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((id, value)) if !id.trim().is_empty() => {
            Ok((id.trim().to_string(), value.to_string()))
        }
        _ => Err(format!(
            "Invalid selection '{raw}'. Expected the form ID=VALUE, e.g. sex-select=F."
        )),
    }
}

// Named options address variables by their configured name, so a custom configuration
// may rename selectors without breaking them.
fn named_selections(
    args: &EncodeArgs,
    config: &FormConfig,
) -> Result<Vec<(String, String)>, Box<dyn std::error::Error>> {
    let named = [
        (CategoricalVariable::ChestPainType, &args.chest_pain),
        (CategoricalVariable::Sex, &args.sex),
        (CategoricalVariable::ExerciseAngina, &args.exercise_angina),
        (CategoricalVariable::StSlope, &args.st_slope),
        (CategoricalVariable::RestingEcg, &args.resting_ecg),
    ];

    let mut selections = Vec::new();
    for (variable, value) in named {
        let Some(value) = value else {
            continue;
        };
        let Some(configured) = config.variable(variable.name()) else {
            return Err(format!(
                "The configuration does not declare the variable '{}' ({variable}).",
                variable.name()
            )
            .into());
        };
        selections.push((configured.selector.clone(), value.clone()));
    }
    Ok(selections)
}

fn run_encode(args: EncodeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => FormConfig::load(path)?,
        None => FormConfig::heart_disease(),
    };
    if args.strict {
        config.unmapped_policy = UnmappedPolicy::Reject;
    }

    let document = FormDocument::from_config(&config);
    let mut controller = FormController::attach(document, &config)?;

    let selections = named_selections(&args, &config)?
        .into_iter()
        .chain(args.selections.iter().cloned());
    for (selector_id, value) in selections {
        for report in controller.select(&selector_id, &value)? {
            log::info!("{}: {:?}", report.variable, report.outcome);
        }
    }

    let encoded = controller.encoded()?;
    emit(&encoded, args.format, args.output.as_deref())
}

fn emit(
    encoded: &EncodedForm,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match (format, output) {
        (OutputFormat::Json, Some(path)) => {
            fs::write(path, encoded.to_json()? + "\n")?;
            eprintln!("> Encoded form written to {}", path.display());
        }
        (OutputFormat::Json, None) => println!("{}", encoded.to_json()?),
        (OutputFormat::Tsv, Some(path)) => {
            encoded.write_tsv_file(path)?;
            eprintln!("> Encoded form written to {}", path.display());
        }
        (OutputFormat::Tsv, None) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            encoded.write_tsv(&mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}

fn run_config(output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = FormConfig::heart_disease();
    match output {
        Some(path) => {
            config.save(&path)?;
            eprintln!("> Configuration written to {}", path.display());
        }
        None => print!("{}", config.to_toml_string()?),
    }
    Ok(())
}

fn run_check(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = FormConfig::load(path)?;
    println!(
        "Configuration OK: {} variables, {} hidden fields, {:?} policy for unmapped values",
        config.variables.len(),
        config
            .variables
            .iter()
            .map(|variable| variable.fields.len())
            .sum::<usize>(),
        config.unmapped_policy
    );
    Ok(())
}
