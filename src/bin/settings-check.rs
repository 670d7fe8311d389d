//! Tool to resolve media server settings and report what the server would run with

use std::net::IpAddr;
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use media_app_settings::config::{check_warnings, SettingsBuilder, ENV_PREFIX};
use media_app_settings::{access, init_logger, SettingsStore, VERSION};

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version = VERSION, about, long_about = None)]
struct Args {
    /// Properties file (key=value)
    #[clap(long)]
    properties: Option<PathBuf>,

    /// JSON settings file, applied after the properties file
    #[clap(long)]
    json: Option<PathBuf>,

    /// Prefix of the environment variables to read
    #[clap(long, default_value = ENV_PREFIX)]
    env_prefix: String,

    /// Ignore environment variables
    #[clap(long)]
    no_env: bool,

    /// Address to check against the allow-list (repeatable)
    #[clap(long = "check-ip")]
    check_ip: Vec<IpAddr>,

    /// Print the settings as JSON instead of a report
    #[clap(long)]
    dump_json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[clap(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    init_logger(&args.log_level);

    let mut builder = SettingsBuilder::new().with_defaults();
    if let Some(path) = &args.properties {
        builder = builder.with_properties_file(path);
    }
    if let Some(path) = &args.json {
        builder = builder.with_json_file(path);
    }
    if !args.no_env {
        builder = builder.with_env(&args.env_prefix);
    }

    let store = match builder.build() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to load settings: {}", e);
            exit(1);
        }
    };

    if args.dump_json {
        match serde_json::to_string_pretty(&store.entries()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialise settings: {}", e);
                exit(1);
            }
        }
        return;
    }

    print_report(&store, &args.check_ip);
}

fn print_report(store: &SettingsStore, check_ip: &[IpAddr]) {
    println!("=== Media App Settings ===\n");

    for entry in store.entries() {
        println!(
            "  {:<45} {:<30} ({})",
            entry.key,
            entry.value.as_deref().unwrap_or("<unset>"),
            entry.source
        );
    }

    let access_list = store.access_list();
    println!("\nRemote allow-list: {}", access_list.raw);
    for mask in access_list.matchers.iter() {
        println!("  - {}", mask);
    }
    for diagnostic in access::parse(&access_list.raw).diagnostics {
        println!("  [REJECTED] {}", diagnostic);
    }

    println!("\nAdaptive bitrate ladder:");
    match store.adaptive_resolution_list() {
        Ok(Some(rungs)) if !rungs.is_empty() => {
            for rung in rungs.iter() {
                println!(
                    "  {}p video {} bps, audio {} bps",
                    rung.height, rung.video_bitrate, rung.audio_bitrate
                );
            }
        }
        Ok(_) => println!("  (none)"),
        Err(e) => println!("  [ERROR] {}", e),
    }

    let warnings = check_warnings(&store.snapshot());
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &warnings {
            println!("  [WARNING] {}", warning);
        }
    }

    if !check_ip.is_empty() {
        println!("\nAccess checks:");
        for ip in check_ip {
            let verdict = if access_list.allows(*ip) { "allowed" } else { "denied" };
            println!("  {:<40} {}", ip, verdict);
        }
    }
}
