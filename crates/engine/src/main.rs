//! Mechanist engine - command line entry point.
//!
//! ```text
//! mechanist-engine                     # print the tag/mechanism catalogue as JSON
//! mechanist-engine identify <literal>  # parse a literal and print its canonical form
//! mechanist-engine tag <literal> <path>
//! ```
//!
//! Objects live in in-memory host adapters for the lifetime of the process.

use std::sync::Arc;

use anyhow::{bail, Context};

use mechanist_engine::infrastructure::clock::SystemClock;
use mechanist_engine::infrastructure::config::EngineConfig;
use mechanist_engine::infrastructure::logging::{init_logging, load_dotenv_from_repo_root};
use mechanist_engine::infrastructure::memory::InMemoryHost;
use mechanist_engine::{registry, Engine, PropertyRegistry, ScriptContext};

fn main() -> anyhow::Result<()> {
    // Load environment from repo root
    load_dotenv_from_repo_root();

    let config = EngineConfig::from_env().context("Invalid engine configuration")?;
    init_logging(&config.log_filter).context("Failed to install tracing subscriber")?;

    tracing::info!(
        server_version = %config.server_version,
        max_attribute_steps = config.max_attribute_steps,
        max_attribute_nesting = config.max_attribute_nesting,
        "Starting Mechanist engine"
    );

    let registry = registry::install(PropertyRegistry::standard())?;
    let memory = InMemoryHost::new();
    let host = memory.host(Arc::new(SystemClock::new()), config.server_version);
    let engine = Engine::new(registry, host, config);
    let script = ScriptContext::script("cli");

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["catalogue"] => {
            let catalogue = engine.registry().meta_catalogue();
            println!("{}", serde_json::to_string_pretty(&catalogue)?);
        }
        ["identify", literal] => {
            let parsed = engine.parse(literal)?;
            for err in &parsed.errors {
                eprintln!("skipped: {}", err);
            }
            println!("{}", engine.identify(&parsed.object)?);
        }
        ["tag", literal, path] => {
            let parsed = engine.parse(literal)?;
            let value = engine.resolve_attribute(&parsed.object, path, &script)?;
            println!("{}", engine.identify(&value)?);
        }
        other => bail!("Unknown command: {}", other.join(" ")),
    }

    Ok(())
}
