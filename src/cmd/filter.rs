use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::settings::Style as TableStyle;
use tabled::{Table, Tabled};

use fzrank::highlight::{self, Style};
use fzrank::{FieldSelector, Query, Ranked, rank};

use crate::args::{FormatArgs, MatchingArgs};
use crate::config::{self, Config};
use crate::input;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct FilterArgs {
    /// Query to rank candidates against
    #[arg(allow_hyphen_values = true)]
    query: String,

    /// File with one candidate per line (default: stdin)
    file: Option<String>,

    #[command(flatten)]
    matching: MatchingArgs,

    /// Show at most N results (default: $FZRANK_LIMIT or config)
    #[arg(short = 'n', long, value_name = "N")]
    limit: Option<usize>,

    /// Drop results scoring below this value
    #[arg(long, value_name = "SCORE", allow_negative_numbers = true)]
    min_score: Option<i64>,

    /// Regex splitting each candidate into fields (use with --nth)
    #[arg(long, value_name = "REGEX", requires = "nth")]
    delimiter: Option<String>,

    /// Match only the Nth field (1-based)
    #[arg(long, value_name = "N", requires = "delimiter")]
    nth: Option<usize>,

    /// Show matched ranges in pretty output
    #[arg(long)]
    ranges: bool,

    #[command(flatten)]
    format: FormatArgs,
}

/// Ranked result set with the counts needed for headers.
struct Filtered<'a> {
    query: Query,
    total: usize,
    matched: usize,
    results: Vec<Ranked<'a>>,
}

pub fn run(args: FilterArgs, config: &Config) -> Result<(), String> {
    let format = args.format.resolve();

    let field = match (&args.delimiter, args.nth) {
        (Some(delimiter), Some(nth)) => {
            if nth == 0 {
                return Err("--nth is 1-based".to_string());
            }
            Some(
                FieldSelector::new(delimiter, nth)
                    .map_err(|e| format!("invalid --delimiter: {}", e))?,
            )
        }
        _ => None,
    };

    let content = input::read_candidates(args.file.as_deref())?;
    let candidates = input::candidate_lines(&content);

    let query = Query::new(
        &args.query,
        args.matching.case_mode(config),
        args.matching.split_tokens(config),
    );

    let filtered = filter(&candidates, query, field.as_ref(), &args, config);

    match format {
        OutputFormat::Pretty => output_pretty(&filtered, &args, config),
        OutputFormat::Plain => output_plain(&filtered, &args, config),
        OutputFormat::Json => output_json(&filtered, &args, config),
        OutputFormat::Yaml => output_yaml(&filtered, &args, config),
    }
}

fn filter<'a>(
    candidates: &[&'a str],
    query: Query,
    field: Option<&FieldSelector>,
    args: &FilterArgs,
    config: &Config,
) -> Filtered<'a> {
    let min_score = args.min_score.or(config.behavior.min_score);
    let limit = args.limit.or_else(|| config::limit(config));

    let mut results = rank(candidates.iter().copied(), &query, field);
    if let Some(min) = min_score {
        results.retain(|r| r.score >= min);
    }
    let matched = results.len();
    if let Some(n) = limit {
        results.truncate(n);
    }

    Filtered {
        query,
        total: candidates.len(),
        matched,
        results,
    }
}

fn build_filter_desc(filtered: &Filtered<'_>, args: &FilterArgs, config: &Config) -> String {
    let mut parts = vec![format!("query=\"{}\"", filtered.query.as_str())];
    parts.push(args.matching.description(config));
    if let (Some(delimiter), Some(nth)) = (&args.delimiter, args.nth) {
        parts.push(format!("field {} of /{}/", nth, delimiter));
    }
    parts.join(", ")
}

/// Row data for pretty output table.
#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "SCORE")]
    score: String,
    #[tabled(rename = "CANDIDATE")]
    text: String,
}

#[derive(Tabled)]
struct TableRowWithRanges {
    #[tabled(rename = "SCORE")]
    score: String,
    #[tabled(rename = "CANDIDATE")]
    text: String,
    #[tabled(rename = "RANGES")]
    ranges: String,
}

fn output_pretty(filtered: &Filtered<'_>, args: &FilterArgs, config: &Config) -> Result<(), String> {
    let filter_desc = build_filter_desc(filtered, args, config);
    println!(
        "{} of {} candidates ({})",
        filtered.matched.to_string().bold(),
        filtered.total,
        filter_desc.dimmed()
    );
    if filtered.results.len() < filtered.matched {
        println!(
            "{}",
            format!("Showing top {}.", filtered.results.len()).dimmed()
        );
    }
    println!();

    if filtered.results.is_empty() {
        println!("{}", "No matches.".dimmed());
        if filtered.query.token_count() > 1 {
            output::hint(config, "every token must match; use --no-split to match the query as one pattern");
        } else if !filtered.query.is_empty() && args.matching.case.is_none() {
            output::hint(config, "use -i to ignore case");
        }
        return Ok(());
    }

    let show_ranges = args.ranges || config.display.show_ranges;
    let style = Style::ansi(config.display.highlight_color.as_deref());
    let max_width = config
        .display
        .max_width
        .unwrap_or_else(|| output::terminal_width().saturating_sub(if show_ranges { 32 } else { 14 }));

    let render = |r: &Ranked<'_>| {
        let (text, ranges) = highlight::truncate_around(r.text, &r.matches, max_width);
        highlight::render(&text, &ranges, &style)
    };

    let table = if show_ranges {
        let rows: Vec<TableRowWithRanges> = filtered
            .results
            .iter()
            .map(|r| TableRowWithRanges {
                score: output::style_score(r.score).to_string(),
                text: render(r),
                ranges: output::truncate_back(&output::format_ranges(&r.matches), 16),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(TableStyle::rounded());
        table
    } else {
        let rows: Vec<TableRow> = filtered
            .results
            .iter()
            .map(|r| TableRow {
                score: output::style_score(r.score).to_string(),
                text: render(r),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(TableStyle::rounded());
        table
    };
    println!("{}", table);

    Ok(())
}

fn output_plain(filtered: &Filtered<'_>, args: &FilterArgs, config: &Config) -> Result<(), String> {
    let filter_desc = build_filter_desc(filtered, args, config);
    println!(
        "Showing {} of {} matches from {} candidates ({})",
        filtered.results.len(),
        filtered.matched,
        filtered.total,
        filter_desc
    );
    println!();

    if filtered.results.is_empty() {
        return Ok(());
    }

    println!("SCORE | INDEX | RANGES | TEXT");
    for r in &filtered.results {
        println!(
            "{} | {} | {} | {}",
            r.score,
            r.index,
            output::format_ranges(&r.matches),
            r.text
        );
    }

    Ok(())
}

#[derive(Serialize)]
struct FilterOutput<'a> {
    query: &'a str,
    case: &'a str,
    split_tokens: bool,
    total: usize,
    matched: usize,
    results: &'a [Ranked<'a>],
}

fn to_output<'a>(filtered: &'a Filtered<'a>, args: &FilterArgs, config: &Config) -> FilterOutput<'a> {
    FilterOutput {
        query: filtered.query.as_str(),
        case: args.matching.case_mode(config).as_str(),
        split_tokens: args.matching.split_tokens(config),
        total: filtered.total,
        matched: filtered.matched,
        results: &filtered.results,
    }
}

fn output_json(filtered: &Filtered<'_>, args: &FilterArgs, config: &Config) -> Result<(), String> {
    let json = serde_json::to_string_pretty(&to_output(filtered, args, config))
        .map_err(|e| format!("JSON serialization failed: {}", e))?;
    println!("{}", json);
    Ok(())
}

fn output_yaml(filtered: &Filtered<'_>, args: &FilterArgs, config: &Config) -> Result<(), String> {
    let yaml = serde_yaml::to_string(&to_output(filtered, args, config))
        .map_err(|e| format!("YAML serialization failed: {}", e))?;
    print!("{}", yaml);
    Ok(())
}
