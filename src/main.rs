use careconnect::adapters::render::StdoutChartSink;
use careconnect::app::commands::HELP;
use careconnect::core::ConfigProvider;
use careconnect::utils::error::ErrorSeverity;
use careconnect::utils::{logger, validation::Validate};
use careconnect::{Action, AnalyticsEngine, CliConfig, Command, LocalStorage, Outcome, Session, TomlConfig};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, cli.log_format);

    tracing::info!("Starting careconnect");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(mut config) => {
                    cli.override_toml(&mut config);
                    run(config, &cli.command).await
                }
                Err(e) => Err(e),
            }
        }
        None => run(cli.clone(), &cli.command).await,
    };

    if let Err(e) = result {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ careconnect failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Medium => 2, // 輸入錯誤，可重試
            ErrorSeverity::High => 1,   // 資料或配置錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run<C>(config: C, command: &Command) -> careconnect::Result<()>
where
    C: ConfigProvider + Validate,
{
    config.validate()?;
    let actions = command.actions()?;

    let engine = AnalyticsEngine::new(LocalStorage::default(), config);
    let store = engine.load_store().await?.into_shared();
    let mut session = Session::new(
        store.clone(),
        engine.rebalancer(),
        engine.chart_builder(),
        engine.config().search_enabled(),
    );

    match command {
        Command::Watch { ticks } => {
            let mut scheduler = engine.charting_scheduler(store, Arc::new(StdoutChartSink));

            tokio::select! {
                fired = scheduler.run(*ticks) => {
                    tracing::info!("✅ Stopped after {} ticks", fired);
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted, stopping the rebalance timer");
                }
            }
        }
        Command::Interactive => {
            let mut scheduler = engine.charting_scheduler(store, Arc::new(StdoutChartSink));
            let timer = tokio::spawn(async move { scheduler.run(None).await });

            println!("{}", HELP);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let result = session.run(stdin, tokio::io::stdout()).await;
            timer.abort();
            result?;
        }
        _ => {
            let mut actions = actions;
            if command.mutates() {
                actions.push(Action::Show);
            }
            for action in actions {
                if let Outcome::Output(text) = session.execute(action).await? {
                    print!("{}", text);
                    if !text.ends_with('\n') {
                        println!();
                    }
                }
            }
        }
    }

    Ok(())
}
