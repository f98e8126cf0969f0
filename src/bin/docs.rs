//! hackbox-docs - summarize `DOCS_TOPIC` and translate it to `DOCS_TARGET_LANGUAGE`.

use hackbox::config::Config;
use hackbox::crew::LlmTaskExecutor;
use hackbox::llm::Llm;
use hackbox::logging;
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
    let llm = Llm::from_config(&config, Pipeline::Docs.default_model());

    let crew = pipelines::docs_crew(&llm, &config.docs_topic, &config.docs_language)?
        .with_verbose(config.verbose_or(true));
    let result = crew.kickoff(&LlmTaskExecutor).await?;

    println!("{}", result);
    Ok(())
}
