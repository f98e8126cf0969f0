//! hackbox-web - form server entry point.

use hackbox::{api, config::Config, logging};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    logging::init_with_dotenv();

    let config = Config::from_env()?;
    info!(
        "Loaded configuration: model={}, mock_ui={}",
        config.model.as_deref().unwrap_or("(pipeline default)"),
        if config.mock_ui.is_enabled() { "enabled" } else { "disabled" }
    );

    api::serve(config).await
}
