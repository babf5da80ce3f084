use anyhow::Result;
use clap::Parser;
use scriptrunner_core::errors::{RunnerError, ScriptError};

mod cli;
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    let parsed = cli::Cli::parse();

    match parsed.dispatch().await {
        Ok(()) => Ok(()),
        Err(err) => {
            // A failing script's own exit code becomes ours
            if let Some(code) = child_exit_code(&err) {
                eprintln!("Error: {:#}", err);
                std::process::exit(code);
            }

            Err(err)
        }
    }
}

fn child_exit_code(err: &anyhow::Error) -> Option<i32> {
    if let Some(runner_error) = err.downcast_ref::<RunnerError>() {
        return runner_error.script_error().and_then(ScriptError::exit_code);
    }
    err.downcast_ref::<ScriptError>()
        .and_then(ScriptError::exit_code)
}
