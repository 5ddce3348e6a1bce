use anyhow::Context;
use clap::Parser;
use tracing::debug;
use vehicle_dashboard::{browse, cli, config, display, export, gateway, logging};
use vehicle_dashboard_common::{Dashboard, ExportScope, FetchOutcome, PlatformScope};

use cli::{Cli, Commands, QueryArgs};
use config::Config;
use gateway::HttpGateway;

/// 引数または設定値からスコープを決める
fn resolve_scope(config: &Config, dashboard: &Dashboard, platform: Option<&str>) -> anyhow::Result<PlatformScope> {
    let text = platform.unwrap_or(&config.default_platform);
    let scope = dashboard
        .platforms()
        .resolve(text)
        .map_err(vehicle_dashboard::error::DashboardError::from)?;
    Ok(scope)
}

/// 取得して検索条件を適用したダッシュボードを作る
async fn load_dashboard(config: &Config, query: &QueryArgs) -> anyhow::Result<Dashboard> {
    let table = config.platform_table();
    let source = HttpGateway::new(table.clone(), config.timeout())?;
    let mut dashboard = Dashboard::new(table);

    let scope = resolve_scope(config, &dashboard, query.platform.as_deref())?;
    let outcome = gateway::load_scope(&mut dashboard, &source, scope).await;
    if let FetchOutcome::Failed { reason, .. } = &outcome {
        eprintln!("⚠ 車両データを取得できませんでした: {}", reason);
    }

    let built = query.to_query();
    dashboard.set_search(&built.search);
    for (dimension, value) in built.filters.active() {
        dashboard.set_filter(dimension, Some(value.to_string()));
    }
    dashboard.set_sort(built.sort);
    debug!(query = ?dashboard.query(), "query applied");

    Ok(dashboard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);
    let config = Config::load().context("設定ファイルの読み込みに失敗しました")?;

    match cli.command {
        Commands::List { query, json } => {
            let dashboard = load_dashboard(&config, &query).await?;
            let view = dashboard.view();

            if json {
                println!("{}", display::render_json(&view)?);
            } else {
                println!("{}", display::fetched_at_line(dashboard.platforms(), dashboard.scope()));
                print!("{}", display::render_table(&view, dashboard.query().sort, None));
                println!("{}", display::render_summary(&view, 0));
            }
        }

        Commands::Export { query, select, output } => {
            let mut dashboard = load_dashboard(&config, &query).await?;

            let scope = match select {
                Some(positions) => {
                    cli::validate_positions(&positions, dashboard.view().len())?;
                    for position in positions {
                        if !dashboard.selection().is_selected(position) {
                            dashboard.toggle_row(position);
                        }
                    }
                    ExportScope::Selected
                }
                None => ExportScope::AllInView,
            };

            println!("- Excelを生成中...");
            let path = export::export_dashboard(&dashboard, scope, &output)?;
            println!("✔ Excel出力: {}", path.display());
        }

        Commands::Browse { platform } => {
            let table = config.platform_table();
            let source = HttpGateway::new(table.clone(), config.timeout())?;
            let mut dashboard = Dashboard::new(table);
            let scope = resolve_scope(&config, &dashboard, platform.as_deref())?;

            browse::run_browse(&mut dashboard, &source, scope, std::path::PathBuf::from(".")).await?;
        }

        Commands::Platforms => {
            print!("{}", display::render_platforms(&config.platform_table()));
        }

        Commands::Config { set_base_url, show } => {
            let mut config = config;

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ ベースURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  ベースURL: {}", config.base_url);
                println!("  実効ベースURL: {}", config.effective_base_url());
                println!("  既定プラットフォーム: {}", config.default_platform);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!(
                    "  プラットフォーム: {}",
                    if config.platforms.is_some() { "カスタム" } else { "組み込み" }
                );
                if let Ok(path) = Config::config_path() {
                    println!("  設定ファイル: {}", path.display());
                }
            }
        }
    }

    Ok(())
}
