//! hackbox-startup - run the startup crew for `STARTUP_IDEA` and print the result.
//!
//! Set `CREW_FILE` to run a custom YAML crew instead; it receives the idea as
//! the `{idea}` input.

use std::collections::HashMap;

use hackbox::config::Config;
use hackbox::crew::{CrewDefinition, LlmTaskExecutor};
use hackbox::llm::Llm;
use hackbox::logging;
use hackbox::mock_ui::MockUiClient;
use hackbox::pipelines::{self, Pipeline};

fn main() -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    logging::init_with_dotenv();

    let config = Config::from_env()?;
    let llm = Llm::from_config(&config, Pipeline::Startup.default_model());
    tracing::info!("Using model {}", llm.model());

    let crew = match &config.crew_file {
        Some(path) => {
            tracing::info!("Loading crew definition from {}", path.display());
            let inputs = HashMap::from([("idea".to_string(), config.startup_idea.clone())]);
            CrewDefinition::from_file(path)?.build(&llm, &inputs)?
        }
        None => pipelines::startup_crew(&llm, &config.startup_idea)?,
    }
    .with_verbose(config.verbose_or(false));

    let mock_ui = MockUiClient::new(&config.mock_ui);
    let run = Pipeline::Startup
        .run_with_mock_ui(&crew, &LlmTaskExecutor, &mock_ui, &config.startup_idea)
        .await?;

    println!("\n===== OUTPUT =====");
    println!("{}", run.output);
    println!("\n===== MOCK UI =====");
    println!("{}", serde_json::to_string_pretty(&run.mock_ui)?);

    Ok(())
}
