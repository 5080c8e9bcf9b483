use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use loc_scatter::{
    Action, Dataset, Explorer,
    actions::parse_point,
    collectors::check_consistency,
    config::ChartConfig,
    home, logging, page,
    pie::Gallery,
    projects, records,
};

#[derive(Debug, clap::Parser)]
#[clap(
    name = "loc-scatter",
    about = "Summarizes a per-line code dataset and plots its commits by time of day.",
    version
)]
struct Cli {
    /// Log debug output
    #[clap(short, long, global = true)]
    verbose: bool,
    #[clap(subcommand)]
    subcommand: Subcommands,
}

#[derive(Debug, Parser)]
struct SummaryArgs {
    #[clap(short, long)]
    input_file: PathBuf,
    /// Print JSON instead of a table
    #[clap(long)]
    json: bool,
}

#[derive(Debug, Parser)]
struct ChartArgs {
    #[clap(long, default_value_t = 1000.0)]
    width: f64,
    #[clap(long, default_value_t = 600.0)]
    height: f64,
    /// Repository URL commit links point into, e.g. https://github.com/me/site
    #[clap(long)]
    commit_url: Option<String>,
}

#[derive(Debug, Parser)]
struct PlotArgs {
    #[clap(short, long)]
    input_file: PathBuf,
    /// `.svg` writes just the chart, anything else a full HTML page
    #[clap(short, long)]
    output_file: PathBuf,
    #[clap(long, default_value = "Meta")]
    title: String,
    /// Interactions to replay before rendering, e.g. `start:60,20` `move:400,500` `end`
    #[clap(short, long = "action")]
    actions: Vec<String>,
    #[clap(flatten)]
    chart: ChartArgs,
}

#[derive(Debug, Parser)]
struct SelectArgs {
    #[clap(short, long)]
    input_file: PathBuf,
    /// One corner of the brush, in chart pixels: X,Y
    #[clap(long)]
    from: String,
    /// The opposite corner: X,Y
    #[clap(long)]
    to: String,
    #[clap(long)]
    json: bool,
    #[clap(flatten)]
    chart: ChartArgs,
}

#[derive(Debug, Parser)]
struct ProjectsArgs {
    #[clap(short, long)]
    input_file: PathBuf,
    #[clap(short, long)]
    output_file: PathBuf,
    /// Search text; matches any field, case-insensitively
    #[clap(short, long, default_value = "")]
    query: String,
    /// Select this year's pie slice
    #[clap(long)]
    year: Option<String>,
}

#[derive(Debug, Parser)]
struct HomeArgs {
    /// projects.json; the first three entries are shown
    #[clap(short, long)]
    input_file: PathBuf,
    /// A saved GitHub user object (`GET /users/{name}`) for the stats card
    #[clap(short, long)]
    profile: Option<PathBuf>,
    #[clap(short, long)]
    output_file: PathBuf,
    #[clap(long, default_value = "Home")]
    title: String,
}

#[derive(Debug, clap::Subcommand)]
enum Subcommands {
    /// Print corpus-wide statistics for a loc.csv file
    Summary(SummaryArgs),
    /// Render the commit scatterplot (and summary) for a loc.csv file
    Plot(PlotArgs),
    /// Brush a region of the chart and print the selected commits' language breakdown
    Select(SelectArgs),
    /// Render the project gallery page from a projects.json file
    Projects(ProjectsArgs),
    /// Render the home page: latest projects and GitHub stats
    Home(HomeArgs),
}

impl ChartArgs {
    fn to_config(&self) -> ChartConfig {
        ChartConfig {
            width: self.width,
            height: self.height,
            commit_url_base: self.commit_url.clone(),
            ..ChartConfig::default()
        }
    }
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    let spinner = ProgressBar::new_spinner().with_style(
        ProgressStyle::default_spinner()
            .template("{spinner} [{elapsed_precise}] {pos} lines {msg}")?,
    );
    spinner.set_message(format!("reading {}", path.display()));

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let parsed = records::read_records(file, |n| {
        if n % 1000 == 0 {
            spinner.set_position(n as u64);
        }
    });
    if parsed.is_err() {
        spinner.abandon();
    } else {
        spinner.finish_and_clear();
    }
    let records = parsed.with_context(|| format!("loading {}", path.display()))?;

    let dataset = Dataset::from_records(records);
    for issue in check_consistency(&dataset) {
        log::warn!(
            "commit {}: lines disagree on {} ({:?} vs {:?}); using the first line's value",
            issue.commit_id,
            issue.field,
            issue.expected,
            issue.found
        );
    }
    log::info!(
        "loaded {} lines across {} commits from {}",
        dataset.records().len(),
        dataset.commits().len(),
        path.display()
    );
    Ok(dataset)
}

fn run_summary(args: SummaryArgs) -> Result<()> {
    let dataset = load_dataset(&args.input_file)?;
    let explorer = Explorer::new(dataset, &ChartConfig::default());
    if args.json {
        println!("{}", serde_json::to_string_pretty(explorer.summary())?);
    } else {
        for (label, value) in explorer.summary().entries() {
            println!("{label:<14}{value}");
        }
    }
    Ok(())
}

fn run_plot(args: PlotArgs) -> Result<()> {
    let dataset = load_dataset(&args.input_file)?;
    let mut explorer = Explorer::new(dataset, &args.chart.to_config());
    for raw in &args.actions {
        let action = Action::parse(raw).with_context(|| format!("bad --action {raw:?}"))?;
        explorer.dispatch(action);
    }

    let is_svg = args
        .output_file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    let contents = if is_svg {
        let view = explorer.view();
        explorer
            .plot()
            .render_svg(&view.markers, explorer.region().as_ref())
    } else {
        page::render_page(&explorer, &args.title)
    };
    if let Some(parent) = args.output_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&args.output_file, contents)
        .with_context(|| format!("writing {}", args.output_file.display()))?;
    println!("Wrote chart to {}", args.output_file.display());
    Ok(())
}

fn run_select(args: SelectArgs) -> Result<()> {
    let from = parse_point(&args.from).context("bad --from")?;
    let to = parse_point(&args.to).context("bad --to")?;
    let dataset = load_dataset(&args.input_file)?;
    let mut explorer = Explorer::new(dataset, &args.chart.to_config());
    explorer.dispatch_all([
        Action::GestureStart(from),
        Action::GestureMove(to),
        Action::GestureEnd,
    ]);

    let view = explorer.view();
    if args.json {
        let ids: Vec<&str> = explorer.selected_commits().map(|c| c.id.as_str()).collect();
        let out = serde_json::json!({
            "region": explorer.region(),
            "selected": ids,
            "count": view.selection_count,
            "breakdown": view.breakdown,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", view.selection_count);
    for commit in explorer.selected_commits() {
        println!("  {} {} {} lines", commit.id, commit.author, commit.total_lines);
    }
    if let Some(rows) = &view.breakdown {
        println!();
        for row in rows {
            println!("{:<12}{:>8} lines {:>7}", row.kind, row.lines, row.percent);
        }
    }
    Ok(())
}

fn run_projects(args: ProjectsArgs) -> Result<()> {
    let list = projects::load_projects(&args.input_file)
        .with_context(|| format!("loading {}", args.input_file.display()))?;
    let mut gallery = Gallery::new(list);
    gallery.set_query(&args.query);
    if let Some(year) = &args.year {
        if !gallery.select_year(year) {
            log::warn!("no projects from {year} match the query; showing all matches");
        }
    }
    fs::write(&args.output_file, gallery.render_page("Projects"))
        .with_context(|| format!("writing {}", args.output_file.display()))?;
    println!(
        "Wrote {} of {} projects to {}",
        gallery.visible().len(),
        gallery.matching().len(),
        args.output_file.display()
    );
    Ok(())
}

fn run_home(args: HomeArgs) -> Result<()> {
    let list = projects::load_projects(&args.input_file)
        .with_context(|| format!("loading {}", args.input_file.display()))?;
    let profile = match &args.profile {
        Some(path) => Some(
            home::load_profile(path).with_context(|| format!("loading {}", path.display()))?,
        ),
        None => None,
    };
    fs::write(
        &args.output_file,
        home::render_home(&list, profile.as_ref(), &args.title),
    )
    .with_context(|| format!("writing {}", args.output_file.display()))?;
    println!("Wrote home page to {}", args.output_file.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    logging::init_logging(args.verbose);
    match args.subcommand {
        Subcommands::Summary(args) => run_summary(args),
        Subcommands::Plot(args) => run_plot(args),
        Subcommands::Select(args) => run_select(args),
        Subcommands::Projects(args) => run_projects(args),
        Subcommands::Home(args) => run_home(args),
    }
}
