//! restoiq: run restaurant analysis queries from the command line.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use restoiq_core::PipelineConfig;
use restoiq_runtime::{Pipeline, PipelineOutcome};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn load_config() -> PipelineConfig {
    match std::env::var("RESTOIQ_CONFIG") {
        Ok(path) if !path.trim().is_empty() => PipelineConfig::load(&PathBuf::from(path)),
        _ => PipelineConfig::from_env(),
    }
}

/// Query text from the remaining args, or stdin when none (or `-`) is given.
fn read_query(args: &[String]) -> anyhow::Result<String> {
    if args.is_empty() || (args.len() == 1 && args[0] == "-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read query from stdin")?;
        return Ok(buf);
    }
    Ok(args.join(" "))
}

/// Pull `--session <id>` out of the argument list.
fn take_session(args: &mut Vec<String>) -> Option<String> {
    let pos = args.iter().position(|a| a == "--session")?;
    if pos + 1 >= args.len() {
        args.remove(pos);
        return None;
    }
    let id = args.remove(pos + 1);
    args.remove(pos);
    Some(id)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_help() {
    println!("restoiq: restaurant analysis pipeline");
    println!();
    println!("Usage: restoiq <command> [args]");
    println!();
    println!("Commands:");
    println!("  run [--session id] <query>   Extract, resolve and dispatch a query");
    println!("  ask [--session id] <query>   Answer a menu question");
    println!("  extract <query>              Show the extracted fields only");
    println!("  classify <query>             Show the keyword classifier's guess");
    println!("  tasks                        List registered tasks");
    println!("  config                       Print the effective configuration");
    println!("  help                         Show this help message");
    println!();
    println!("A query of '-' (or none) is read from stdin.");
    println!("Environment: RESTOIQ_CONFIG, RESTOIQ_ENVELOPE_VERSION, RESTOIQ_LOCK_REGISTRY,");
    println!("             RESTOIQ_MAX_QUERY_LEN, RUST_LOG");
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1) else {
        print_help();
        return Ok(());
    };
    let mut rest: Vec<String> = args[2..].to_vec();

    match command.as_str() {
        "run" => {
            let session = take_session(&mut rest);
            let query = read_query(&rest)?;
            let pipeline = Pipeline::with_defaults(load_config());
            let outcome = pipeline.run(&query, session.as_deref());
            print_json(&outcome)?;
            if let PipelineOutcome::Dispatched { status, .. } = &outcome {
                if !status.is_success() {
                    std::process::exit(1);
                }
            }
        }
        "ask" => {
            let session = take_session(&mut rest);
            let query = read_query(&rest)?;
            let pipeline = Pipeline::with_defaults(load_config());
            match pipeline.ask(&query, session.as_deref()) {
                Some(answer) => print_json(&answer)?,
                None => {
                    print_json(&restoiq_intent::classify_keywords(&query))?;
                    std::process::exit(1);
                }
            }
        }
        "extract" => {
            let query = read_query(&rest)?;
            let config = load_config();
            let extraction = restoiq_extract::FieldExtractor::new(config.max_query_len).extract(&query);
            print_json(&extraction)?;
        }
        "classify" => {
            let query = read_query(&rest)?;
            let suggestion = restoiq_intent::classify_keywords(&query);
            let params = restoiq_intent::extract_parameters(&query);
            let follow_ups = restoiq_intent::suggest_follow_ups(suggestion.intent);
            print_json(&serde_json::json!({
                "intent": suggestion,
                "parameters": params,
                "followUps": follow_ups,
            }))?;
        }
        "tasks" => {
            let pipeline = Pipeline::with_defaults(load_config());
            let tasks: Vec<_> = pipeline.registry().tasks().collect();
            info!("{} tasks registered", tasks.len());
            print_json(&tasks)?;
        }
        "config" => {
            let config = load_config();
            config.validate()?;
            print_json(&config)?;
        }
        "--help" | "-h" | "help" => print_help(),
        other => {
            eprintln!("Unknown command: {}. Use 'restoiq help' for usage.", other);
            std::process::exit(1);
        }
    }

    Ok(())
}
