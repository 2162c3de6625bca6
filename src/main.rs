use clap::{Parser as ClapParser, Subcommand};
use functional::config::Config;
use functional::error::CliError;
use functional::{BlockTokenizer, Builtin, Context, Environment, Outcome, Scanner, Value};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(author, version, about = "Functional language front end")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a source file and print its classified tokens
    Tokenize {
        /// Source file, or - for standard input
        file: String,
        /// Print the tokens as JSON
        #[arg(long)]
        json: bool,
        /// Grammar file to use instead of the configured one
        #[arg(long)]
        grammar: Option<PathBuf>,
        /// Fail on unterminated string literals
        #[arg(long)]
        strict: bool,
    },
    /// Split a loop/while body into fragments
    Blocks {
        /// The body text
        body: String,
    },
    /// Call one standard library built-in with literal arguments
    Call {
        /// Built-in name, e.g. concat
        name: String,
        /// Arguments: numbers, true/false, "quoted strings" or bare text
        args: Vec<String>,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a config file with the defaults
    Init,
    /// Print where the config file lives
    Path,
}

fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_source(file: &str) -> Result<String, CliError> {
    if file == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        Ok(fs::read_to_string(file)?)
    }
}

fn tokenize(
    config: &Config,
    file: &str,
    json: bool,
    grammar: Option<PathBuf>,
    strict: bool,
) -> Result<(), CliError> {
    let mut config = config.clone();
    if grammar.is_some() {
        config.grammar = grammar;
    }
    config.strict_strings |= strict;

    let source = read_source(file)?;
    let table = config.pattern_table()?;
    let tokens = Scanner::new(&table, config.scan_options())?.scan(&source)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }
    Ok(())
}

fn call(config: &Config, name: &str, args: &[String]) -> Result<(), CliError> {
    let builtin =
        Builtin::from_name(name).ok_or_else(|| CliError::UnknownBuiltin(name.to_string()))?;
    let args: Vec<Option<Value>> =
        args.iter().map(|arg| Some(Value::parse_literal(arg))).collect();

    let env = Environment::with_admission(config.admission);
    let mut ctx = Context::new(env, io::stdin().lock(), io::stdout())?;
    match ctx.call(builtin, &args)? {
        Outcome::Value(value) => println!("{}", value),
        Outcome::Absent => println!("undefined"),
        Outcome::Terminate => std::process::exit(0),
    }
    Ok(())
}

fn configure(config: &Config, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigCommands::Init => {
            let path = Config::get_config_path();
            if path.exists() {
                println!("Config file already exists at: {}", path.display());
            } else {
                Config::default().save_to(&path)?;
                println!("Initialized new config file at: {}", path.display());
            }
        }
        ConfigCommands::Path => {
            println!("{}", Config::get_config_path().display());
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::load()?;

    match cli.command {
        Commands::Tokenize {
            file,
            json,
            grammar,
            strict,
        } => tokenize(&config, &file, json, grammar, strict),
        Commands::Blocks { body } => {
            for fragment in BlockTokenizer::new()?.tokenize(&body) {
                println!("{}", fragment);
            }
            Ok(())
        }
        Commands::Call { name, args } => call(&config, &name, &args),
        Commands::Config { command } => configure(&config, command),
    }
}

fn main() -> ExitCode {
    install_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
