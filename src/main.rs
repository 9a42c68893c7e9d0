use anyhow::{bail, Context};
use scatter::cli::init::{self, InitConfig, InitResult};
use scatter::cli::output::Output;
use scatter::cli::{Cli, Commands};
use scatter::utils::toml_config::{LogFormat, ResearchConfig, DEFAULT_CONFIG_FILE};
use scatter::{ResearchCoordinator, ResultSink, WorkflowGraph};
use std::process::ExitCode;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match run(cli, &output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, output: &Output) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init { path, force }) => {
            let config = InitConfig {
                path: path.clone(),
                force: *force,
            };
            match init::run(config, output) {
                InitResult::Success => Ok(()),
                InitResult::AlreadyExists => bail!("{} already exists", DEFAULT_CONFIG_FILE),
                InitResult::Error(e) => bail!("init failed: {}", e),
            }
        }
        Some(Commands::Plan) => {
            let config = load_config(&cli)?;
            plan(&config, output)
        }
        None => {
            let config = load_config(&cli)?;
            init_tracing(&config, cli.verbose, cli.log_json);
            research(&config, output).await
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ResearchConfig> {
    let config = ResearchConfig::load_with_overrides(cli.config.as_deref(), |config| {
        cli.run.apply(config)
    })?;
    Ok(config)
}

fn init_tracing(config: &ResearchConfig, verbose: bool, json: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if json || config.logging.format == LogFormat::Json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn plan(config: &ResearchConfig, output: &Output) -> anyhow::Result<()> {
    let graph = WorkflowGraph::build_with_agents(
        config.workflow.queries.as_slice(),
        &config.agents.search,
        &config.agents.summary,
    );

    output.section("Workflow plan");
    output.setting("process", config.workflow.process);
    output.setting("max concurrency", config.workflow.max_concurrency);
    output.setting("synthesizer", config.synthesis.strategy);
    output.setting("output", config.workflow.output.display());

    for (i, stage) in graph.stages()?.iter().enumerate() {
        output.stage(i);
        for node in stage {
            output.plan_node(node);
        }
    }
    output.newline();
    Ok(())
}

async fn research(config: &ResearchConfig, output: &Output) -> anyhow::Result<()> {
    output.banner();

    let coordinator = ResearchCoordinator::from_config(config).await?;
    let queries = config.workflow.queries.as_slice();

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling outstanding searches");
            interrupt.cancel();
        }
    });

    output.section("Running parallel search tasks...");
    let clock = Instant::now();
    let results = coordinator.research(queries, cancel).await?;

    for node in coordinator.graph(queries).nodes() {
        output.node_report(node, &results);
    }

    let path = &config.workflow.output;
    ResultSink::persist(&results, path)
        .await
        .with_context(|| format!("failed to save results to {}", path.display()))?;

    output.finished(path, clock.elapsed());
    Ok(())
}
