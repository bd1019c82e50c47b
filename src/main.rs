mod config;
mod error;
mod executor;
mod maestro;
mod motion;
mod pipeline;
mod plan;
mod position;
mod translator;

#[cfg(test)]
mod testutil;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info, warn};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};

use config::ArmConfig;
use error::ArmError;
use executor::PlanExecutor;
use maestro::MaestroController;
use motion::MotionContext;
use pipeline::Pipeline;
use position::PositionStore;
use translator::PassthroughTranslator;

const CONFIG_PATH: &str = "arm.json";

fn load_config() -> Result<ArmConfig> {
    let cfg = match ArmConfig::load(CONFIG_PATH) {
        Ok(cfg) => {
            info!("loaded config from {}", CONFIG_PATH);
            cfg
        }
        Err(e) => {
            warn!("could not load {}: {} - writing defaults", CONFIG_PATH, e);
            let cfg = ArmConfig::new();
            cfg.save(CONFIG_PATH)
                .with_context(|| format!("writing default config to {}", CONFIG_PATH))?;
            cfg
        }
    };
    cfg.validate().context("invalid channel configuration")?;
    Ok(cfg)
}

fn main() -> Result<()> {
    TermLogger::init(
        LevelFilter::Info,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let cfg = load_config()?;

    let controller = MaestroController::open(&cfg.serial_port)
        .with_context(|| format!("opening Maestro on {}", cfg.serial_port))?;
    info!("Maestro connected on {}", cfg.serial_port);

    let store = PositionStore::new(Box::new(controller), &cfg.channels);
    let ctx = MotionContext::new(
        store,
        cfg.channels.clone(),
        cfg.interpolation_steps,
        cfg.frame_delay_ms,
    );
    let executor = Arc::new(PlanExecutor::new(ctx));

    // Push every channel to neutral before accepting commands.
    executor.reset().context("initial neutral reset failed")?;

    // Ctrl-C stops the running plan; a second one kills the process.
    let cancel_handle = Arc::clone(&executor);
    ctrlc::set_handler(move || {
        warn!("cancel requested");
        cancel_handle.cancel();
    })?;

    let pipeline = Pipeline::new(Box::new(PassthroughTranslator), Arc::clone(&executor));

    info!(
        "type a plan ({} comma-separated pulses per step, steps separated by '|'), or 'reset'",
        cfg.channel_count()
    );

    let stdin = io::stdin();
    loop {
        print!(">> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }

        if prompt == "reset" {
            executor.reset()?;
            info!("back at neutral: {:?}", executor.position());
            continue;
        }

        match pipeline.handle_prompt(prompt) {
            Ok(outcome) => info!("{:?}, position now {:?}", outcome, executor.position()),
            Err(e @ ArmError::ActuatorWrite { .. }) => {
                error!("hardware write failed, aborting: {}", e);
                return Err(e.into());
            }
            Err(e) => error!("{}", e),
        }
    }

    Ok(())
}
