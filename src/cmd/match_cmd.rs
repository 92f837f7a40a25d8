use clap::Args;
use colored::Colorize;

use fzrank::highlight::{self, Style};
use fzrank::{MatchResult, fuzzy_match};

use crate::args::FormatArgs;
use crate::config::Config;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct MatchArgs {
    /// Text to search in
    text: String,

    /// Pattern to match (empty matches trivially at 0)
    #[arg(allow_hyphen_values = true)]
    pattern: String,

    /// Compare characters exactly instead of folding ASCII case
    #[arg(short = 's', long)]
    case_sensitive: bool,

    /// Exit with status 1 when the pattern does not match
    #[arg(short = 'e', long)]
    exit_status: bool,

    #[command(flatten)]
    format: FormatArgs,
}

pub fn run(args: MatchArgs, config: &Config) -> Result<(), String> {
    let format = args.format.resolve();
    let result = fuzzy_match(&args.text, &args.pattern, args.case_sensitive);

    match format {
        OutputFormat::Pretty => output_pretty(&args.text, &result, config),
        OutputFormat::Plain => output_plain(&result),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| format!("JSON serialization failed: {}", e))?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&result)
                .map_err(|e| format!("YAML serialization failed: {}", e))?;
            print!("{}", yaml);
        }
    }

    if args.exit_status && !result.is_match() {
        return Err("no match".to_string());
    }
    Ok(())
}

fn output_pretty(text: &str, result: &MatchResult, config: &Config) {
    if !result.is_match() {
        println!("{}", "No match.".dimmed());
        return;
    }

    let style = Style::ansi(config.display.highlight_color.as_deref());
    println!("{}", highlight::render(text, &result.matches, &style));
    println!(
        "{} {}  {} {}..{}  {} {}",
        "score".dimmed(),
        output::style_score(result.score),
        "window".dimmed(),
        result.start,
        result.end,
        "ranges".dimmed(),
        output::format_ranges(&result.matches)
    );
}

fn output_plain(result: &MatchResult) {
    println!("START | END | SCORE | RANGES");
    println!(
        "{} | {} | {} | {}",
        result.start,
        result.end,
        result.score,
        output::format_ranges(&result.matches)
    );
}
