//! AutoSys log retriever CLI.
//!
//! Entry point for the `autosys-logs` command-line tool.

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;

use autosys_logs::config::{ConfigError, Defaults};
use autosys_logs::{auth, retrieve, CliBackend, LogStream, RestBackend, RetrievalResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Parser)]
#[command(name = "autosys-logs")]
#[command(about = "Retrieve stdout/stderr logs for AutoSys jobs", version)]
struct Cli {
    /// Name of the AutoSys job (alternative to -j/--job)
    job_positional: Option<String>,

    /// Name of the AutoSys job
    #[arg(short = 'j', long = "job", value_name = "JOB")]
    job: Option<String>,

    /// AutoSys username (prompts securely when no password is given)
    #[arg(short = 'u', long = "user")]
    user: Option<String>,

    /// AutoSys password (prefer -u alone and the secure prompt)
    #[arg(short = 'p', long = "pass", alias = "password")]
    pass: Option<String>,

    /// AutoSys instance name
    #[arg(short = 'i', long = "instance")]
    instance: Option<String>,

    /// AutoSys server
    #[arg(short = 's', long = "server")]
    server: Option<String>,

    /// Query the AEWS REST API instead of the command-line utilities
    #[arg(long)]
    rest: bool,

    /// AEWS API port (default: 8443)
    #[arg(long)]
    port: Option<u16>,

    /// Accept any TLS certificate and hostname (REST only)
    #[arg(long)]
    insecure: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Path to a defaults file (default: ~/.config/autosys-logs/config.toml)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let job_name = match cli.job.clone().or_else(|| cli.job_positional.clone()) {
        Some(job) => job,
        None => {
            eprintln!("Error: job name is required. Use -j/--job or provide it as a positional argument.");
            process::exit(2);
        }
    };

    let defaults = match load_defaults(cli.config.as_deref()) {
        Ok(defaults) => defaults,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(2);
        }
    };

    let username = cli.user.clone().or_else(|| defaults.username.clone());
    let instance = cli.instance.clone().or_else(|| defaults.instance.clone());
    let server = cli.server.clone().or_else(|| defaults.server.clone());
    let insecure = cli.insecure || defaults.insecure.unwrap_or(false);
    let port = defaults.effective_port(cli.port);

    let auth = match auth::resolve(username, cli.pass.clone(), instance, server, insecure) {
        Ok(auth) => auth,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    eprintln!("Retrieving logs for AutoSys job: {}", job_name);

    let result = if cli.rest {
        match RestBackend::new(&auth, port) {
            Ok(backend) => retrieve(&backend, &job_name),
            Err(e) => RetrievalResult::failure(&job_name, e.to_string()),
        }
    } else {
        let backend = CliBackend::new(auth);
        retrieve(&backend, &job_name)
    };

    match cli.format {
        OutputFormat::Json => {
            let json = if cli.pretty {
                result.to_json_pretty()
            } else {
                result.to_json()
            };
            match json {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing output: {}", e);
                    process::exit(1);
                }
            }
        }
        OutputFormat::Text => print_text(&result),
    }

    process::exit(if result.success { 0 } else { 1 });
}

fn load_defaults(path: Option<&Path>) -> Result<Defaults, ConfigError> {
    match path {
        Some(path) => Defaults::load(path),
        None => Defaults::load_default(),
    }
}

fn print_text(result: &RetrievalResult) {
    println!("Job Name: {}", result.job_name);
    println!("Status: {}", result.status.as_deref().unwrap_or("Unknown"));

    if let Some(ref run) = result.last_run {
        if let Some(ref timestamp) = run.timestamp {
            println!("Last Run: {}", timestamp);
        }
        if let Some(id) = run.id {
            println!("Last Run Id: {}", id);
        }
        if let Some(ref start) = run.start_time {
            println!("Start Time: {}", start);
        }
        if let Some(ref end) = run.end_time {
            println!("End Time: {}", end);
        }
    }

    for (key, value) in &result.metadata {
        println!("{}: {}", key, value);
    }

    if let Some(ref error) = result.error {
        println!();
        println!("Error: {}", error);
        return;
    }

    println!();
    print_stream("STDOUT LOG", &result.logs.stdout);
    println!();
    print_stream("STDERR LOG", &result.logs.stderr);
}

fn print_stream(title: &str, stream: &LogStream) {
    match stream {
        LogStream::Content(content) => {
            println!("{}:", title);
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
        }
        LogStream::Streamed => println!("{}: streamed to console above", title),
        LogStream::NotAvailable => println!("{}: Not available", title),
    }
}
