use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use wine_explorer::app::shell::run_shell;
use wine_explorer::config::cli::{Command, ExportTarget};
use wine_explorer::domain::model::HeatmapFilters;
use wine_explorer::utils::logger;
use wine_explorer::utils::validation::validate_path;
use wine_explorer::{
    render_error, CliConfig, Dashboard, ExportFormat, Exporter, HttpWineApi, LocalStorage,
    Settings, View, WineError,
};

type CommandResult = std::result::Result<String, (View, WineError)>;

fn at(view: View) -> impl FnOnce(WineError) -> (View, WineError) {
    move |e| (view, e)
}

fn exit_with(error: &WineError, line: &str) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        error,
        error.category(),
        error.severity()
    );
    eprintln!("❌ {}", line);
    eprintln!("💡 Suggestion: {}", error.recovery_suggestion());
    std::process::exit(error.exit_code());
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

    let settings = match Settings::load(cli.config.as_deref(), cli.api_url.as_deref()) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e, &e.user_friendly_message()),
    };
    tracing::debug!("Using API at {}", settings.api_base_url);

    let api = match HttpWineApi::from_config(&settings) {
        Ok(api) => api,
        Err(e) => exit_with(&e, &e.user_friendly_message()),
    };
    let mut dashboard = Dashboard::new(api, &settings);

    match run(&mut dashboard, cli.command).await {
        Ok(output) => print!("{}", output),
        Err((view, e)) => {
            let line = render_error(view, &e);
            exit_with(&e, &line);
        }
    }
}

async fn run(dashboard: &mut Dashboard<HttpWineApi>, command: Command) -> CommandResult {
    match command {
        Command::Map { min_wines } => dashboard.world_map(min_wines).await.map_err(at(View::WorldMap)),
        Command::Country { name, pages } => load_country(dashboard, &name, pages).await,
        Command::Scatter { pages, max_price } => dashboard
            .scatter(pages, max_price)
            .await
            .map_err(at(View::Scatter)),
        Command::Bucket {
            price,
            points,
            pages,
        } => load_bucket(dashboard, price, points, pages).await,
        Command::Heatmap(args) => dashboard
            .heatmap(&HeatmapFilters::from(&args))
            .await
            .map_err(at(View::Heatmap)),
        Command::Search(args) => {
            let filters = args.to_filters().map_err(at(View::Search))?;
            dashboard.search(filters).await.map_err(at(View::Search))
        }
        Command::List(args) => {
            let filters = args.to_filters().map_err(at(View::WineList))?;
            dashboard.list(&filters).await.map_err(at(View::WineList))
        }
        Command::Ask { question } if question.is_empty() => ask_from_stdin(dashboard).await,
        Command::Ask { question } => dashboard
            .ask(&question.join(" "))
            .await
            .map_err(at(View::Answer)),
        Command::Wine { id } => dashboard.wine(id).await.map_err(at(View::WineDetail)),
        Command::Filters { options } => dashboard
            .filter_lists(options)
            .await
            .map_err(at(View::Filters)),
        Command::Shell => {
            let input = BufReader::new(tokio::io::stdin());
            let mut output = tokio::io::stdout();
            run_shell(dashboard, input, &mut output)
                .await
                .map_err(at(View::Shell))?;
            Ok(String::new())
        }
        Command::Export {
            target,
            format,
            output,
        } => export(dashboard, target, format, output).await,
    }
}

async fn load_country(dashboard: &mut Dashboard<HttpWineApi>, name: &str, pages: u32) -> CommandResult {
    let mut out = dashboard
        .select_country(name)
        .await
        .map_err(at(View::CountryWines))?;
    for _ in 1..pages {
        if !dashboard.country_has_more() {
            break;
        }
        out = dashboard.more_country().await.map_err(at(View::CountryWines))?;
    }
    Ok(out)
}

async fn load_bucket(
    dashboard: &mut Dashboard<HttpWineApi>,
    price: f64,
    points: f64,
    pages: u32,
) -> CommandResult {
    let mut out = dashboard
        .select_bucket(price, points)
        .await
        .map_err(at(View::BucketWines))?;
    for _ in 1..pages {
        if !dashboard.bucket_has_more() {
            break;
        }
        out = dashboard.more_bucket().await.map_err(at(View::BucketWines))?;
    }
    Ok(out)
}

/// 每一行視為一個問題，重複的問題由快取回答
async fn ask_from_stdin(dashboard: &mut Dashboard<HttpWineApi>) -> CommandResult {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = String::new();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| (View::Answer, WineError::from(e)))?
    {
        if line.trim().is_empty() {
            continue;
        }
        match dashboard.ask(&line).await {
            Ok(answer) => out.push_str(&answer),
            Err(e) => out.push_str(&format!("❌ {}\n", render_error(View::Answer, &e))),
        }
        out.push('\n');
    }
    Ok(out)
}

async fn export(
    dashboard: &mut Dashboard<HttpWineApi>,
    target: ExportTarget,
    format: ExportFormat,
    output: String,
) -> CommandResult {
    validate_path("--output", &output).map_err(at(View::Export))?;
    let exporter = Exporter::new(LocalStorage::new(output));

    let location = match target {
        ExportTarget::Search(args) => {
            let filters = args.to_filters().map_err(at(View::Search))?;
            dashboard.search(filters).await.map_err(at(View::Search))?;
            exporter
                .export("search", dashboard.search_rows(), format)
                .await
        }
        ExportTarget::Bucket {
            price,
            points,
            pages,
        } => {
            load_bucket(dashboard, price, points, pages).await?;
            exporter
                .export("bucket", dashboard.bucket_rows(), format)
                .await
        }
        ExportTarget::Country { name, pages } => {
            load_country(dashboard, &name, pages).await?;
            exporter
                .export("country", dashboard.country_rows(), format)
                .await
        }
    }
    .map_err(at(View::Export))?;

    Ok(format!("✅ Export completed\n📁 Output saved to: {}\n", location))
}
