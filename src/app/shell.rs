use crate::app::dashboard::{render_error, Dashboard, View};
use crate::core::WineApi;
use crate::domain::model::{HeatmapFilters, WineFilters};
use crate::utils::error::{Result, WineError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const PROMPT: &str = "wine> ";

const HELP: &str = "\
Commands:
  map [MIN_WINES]        average rating per country
  country NAME           wines from a country
  scatter [PAGES]        price vs rating scatter plot (repeat to load more)
  bucket PRICE POINTS    wines in the bucket containing a point
  more                   next page of the last country or bucket
  heatmap                price vs rating heatmap
  search QUERY           keywords, or filters like country=Italy&min_points=90
  next | prev | page N   move through search results
  ask QUESTION           ask a question about wines
  wine ID                details of a single wine
  filters                available countries and varieties
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Help,
    Map(Option<u32>),
    Country(String),
    Scatter(u32),
    Bucket(f64, f64),
    More,
    Heatmap,
    Search(WineFilters),
    Next,
    Previous,
    Page(u32),
    Ask(String),
    Wine(i64),
    Filters,
    Quit,
}

impl ShellCommand {
    /// 解析一行輸入；空白行回傳 `None`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            "map" => ShellCommand::Map(optional_number(rest, "min_wines")?),
            "country" => ShellCommand::Country(required(rest, "country NAME")?.to_string()),
            "scatter" => ShellCommand::Scatter(optional_number(rest, "pages")?.unwrap_or(1)),
            "bucket" => {
                let mut parts = rest.split_whitespace();
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(price), Some(points), None) => ShellCommand::Bucket(
                        number(price, "price")?,
                        number(points, "points")?,
                    ),
                    _ => return Err(WineError::validation("Usage: bucket PRICE POINTS")),
                }
            }
            "more" => ShellCommand::More,
            "heatmap" => ShellCommand::Heatmap,
            "search" => ShellCommand::Search(search_filters(required(rest, "search QUERY")?)?),
            "next" => ShellCommand::Next,
            "prev" | "previous" => ShellCommand::Previous,
            "page" => ShellCommand::Page(number(required(rest, "page N")?, "page")?),
            "ask" => ShellCommand::Ask(required(rest, "ask QUESTION")?.to_string()),
            "wine" => ShellCommand::Wine(number(required(rest, "wine ID")?, "id")?),
            "filters" => ShellCommand::Filters,
            other => {
                return Err(WineError::validation(format!(
                    "Unknown command '{}'; type 'help' for a list",
                    other
                )))
            }
        };
        Ok(Some(command))
    }
}

fn required<'a>(value: &'a str, usage: &str) -> Result<&'a str> {
    if value.is_empty() {
        Err(WineError::validation(format!("Usage: {}", usage)))
    } else {
        Ok(value)
    }
}

fn number<T: std::str::FromStr>(value: &str, field: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| WineError::validation(format!("Invalid {}: '{}'", field, value)))
}

fn optional_number<T: std::str::FromStr>(value: &str, field: &str) -> Result<Option<T>> {
    if value.is_empty() {
        Ok(None)
    } else {
        number(value, field).map(Some)
    }
}

/// 含 `=` 時視為 query string，否則當作關鍵字
fn search_filters(query: &str) -> Result<WineFilters> {
    if query.contains('=') {
        WineFilters::from_query_string(query)
    } else {
        Ok(WineFilters {
            search: Some(query.to_string()),
            ..Default::default()
        })
    }
}

async fn execute<A: WineApi>(
    dashboard: &mut Dashboard<A>,
    command: ShellCommand,
) -> (View, Result<String>) {
    match command {
        ShellCommand::Map(min_wines) => (View::WorldMap, dashboard.world_map(min_wines).await),
        ShellCommand::Country(name) => (View::CountryWines, dashboard.select_country(&name).await),
        ShellCommand::Scatter(pages) => (View::Scatter, dashboard.scatter(pages, 200.0).await),
        ShellCommand::Bucket(price, points) => (
            View::BucketWines,
            dashboard.select_bucket(price, points).await,
        ),
        ShellCommand::More => match dashboard.more().await {
            Ok((view, out)) => (view, Ok(out)),
            Err(e) => (View::BucketWines, Err(e)),
        },
        ShellCommand::Heatmap => (
            View::Heatmap,
            dashboard.heatmap(&HeatmapFilters::default()).await,
        ),
        ShellCommand::Search(filters) => (View::Search, dashboard.search(filters).await),
        ShellCommand::Next => (View::Search, dashboard.next_page().await),
        ShellCommand::Previous => (View::Search, dashboard.previous_page().await),
        ShellCommand::Page(page) => (View::Search, dashboard.go_to_page(page).await),
        ShellCommand::Ask(question) => (View::Answer, dashboard.ask(&question).await),
        ShellCommand::Wine(id) => (View::WineDetail, dashboard.wine(id).await),
        ShellCommand::Filters => (View::Filters, dashboard.filter_lists(false).await),
        ShellCommand::Help | ShellCommand::Quit => (View::WorldMap, Ok(HELP.to_string())),
    }
}

/// 逐行讀取指令直到輸入結束或 `quit`
pub async fn run_shell<A, R, W>(dashboard: &mut Dashboard<A>, input: R, output: &mut W) -> Result<()>
where
    A: WineApi,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    tracing::debug!("Shell started");

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let text = match ShellCommand::parse(&line) {
            Ok(None) => continue,
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => match execute(dashboard, command).await {
                (_, Ok(out)) => out,
                (view, Err(e)) => format!("❌ {}\n", render_error(view, &e)),
            },
            Err(e) => format!("{}\n", e),
        };

        output.write_all(text.as_bytes()).await?;
        if !text.ends_with('\n') {
            output.write_all(b"\n").await?;
        }
    }

    output.write_all(b"\n").await?;
    output.flush().await?;
    tracing::debug!("Shell finished");
    Ok(())
}
