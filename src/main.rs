use clap::Parser;
use savings_planner::app::commands::run_command;
use savings_planner::config::Command;
use savings_planner::utils::error::{ErrorSeverity, PlannerError};
use savings_planner::utils::{logger, validation::Validate};
use savings_planner::{AppConfig, CliConfig, PlanSession, Planner, PostalCodeLookup, RestPlanStore};

fn load_config(cli: &CliConfig) -> Result<AppConfig, PlannerError> {
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            AppConfig::from_file(path)?
        }
        None => {
            tracing::debug!("No config file given, reading PLANNER_* environment variables");
            AppConfig::from_env()?
        }
    };
    config.validate()?;
    Ok(config)
}

async fn run(cli: CliConfig) -> Result<(), PlannerError> {
    let mut stdout = std::io::stdout();

    // 不需連線的命令
    if let Command::Regions = cli.command {
        print!("{}", savings_planner::app::report::render_regions());
        return Ok(());
    }

    let config = load_config(&cli)?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    let store = RestPlanStore::new(&config)?;
    let lookup = PostalCodeLookup::from_config(&config)?;
    let planner = Planner::new(store, lookup);
    let mut session = PlanSession::new();

    run_command(&planner, &mut session, cli.command, &mut stdout).await
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(cli).await {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}
