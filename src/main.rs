use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use enrollment_dashboard::dataset::DEFAULT_DATA_FILE;
use enrollment_dashboard::export::{self, EXPORT_FILE_NAME};
use enrollment_dashboard::report::{build_report, format_count, format_number};
use enrollment_dashboard::{
    blocks, filter, render, Choice, Dataset, DayType, RenderParams, Selection,
};

#[derive(Parser)]
#[command(name = "enrollment-dashboard")]
#[command(about = "Filter and aggregate regional enrollment records", long_about = None)]
struct Cli {
    /// Feature-engineered enrollment CSV
    #[arg(long, env = "ENROLLMENT_DATA", default_value = DEFAULT_DATA_FILE, global = true)]
    data: PathBuf,
    #[command(flatten)]
    filters: FilterArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// State to include; repeat for several, `All` for every state
    #[arg(long = "state", global = true)]
    states: Vec<String>,
    #[arg(long = "year", global = true)]
    years: Vec<String>,
    #[arg(long = "quarter", global = true)]
    quarters: Vec<String>,
    #[arg(long, value_enum, default_value_t = DayType::All, global = true)]
    day_type: DayType,
}

impl FilterArgs {
    fn selection(&self) -> anyhow::Result<Selection> {
        Ok(Selection {
            states: Choice::from_labels(&self.states).context("invalid --state")?,
            years: Choice::from_labels(&self.years).context("invalid --year")?,
            quarters: Choice::from_labels(&self.quarters).context("invalid --quarter")?,
            day_type: self.day_type,
        })
    }
}

#[derive(Args)]
struct BlockArgs {
    /// State to drill down into (defaults to the first state in view)
    #[arg(long)]
    focus_state: Option<String>,
    /// States to compare, at most five (defaults to the first three in view)
    #[arg(long = "compare")]
    compare_states: Vec<String>,
    /// Numeric column for the statistical summary
    #[arg(long)]
    metric: Option<String>,
    /// Columns shown by the data explorer (defaults to the first ten)
    #[arg(long = "column")]
    columns: Vec<String>,
}

impl BlockArgs {
    fn params(self) -> RenderParams {
        let non_empty = |values: Vec<String>| (!values.is_empty()).then_some(values);
        RenderParams {
            focus_state: self.focus_state,
            compare_states: non_empty(self.compare_states),
            columns: non_empty(self.columns),
            metric: self.metric,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the values each control offers
    Options,
    /// Print the key performance indicators
    Kpis,
    /// Write a markdown report of every section
    Report {
        #[command(flatten)]
        args: BlockArgs,
        #[arg(long, default_value = "dashboard.md")]
        out: PathBuf,
    },
    /// Write the full dashboard as JSON
    Render {
        #[command(flatten)]
        args: BlockArgs,
        /// Defaults to stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Export the filtered records as CSV
    Export {
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let dataset = Dataset::load(&cli.data).context("Data file not found or unreadable")?;
    let selection = cli.filters.selection()?;

    match cli.command {
        Commands::Options => {
            let options = dataset.filter_options();
            let view = filter::apply(&dataset, &selection);
            println!("States: {}", options.states.join(", "));
            println!("Years: {}", join(&options.years));
            println!("Quarters: {}", join(&options.quarters));
            println!("Drill-down / comparison states: {}", view.states().join(", "));
            println!("Columns: {}", dataset.headers().join(", "));
            println!("Numeric metrics: {}", dataset.numeric_columns().join(", "));
        }
        Commands::Kpis => {
            let view = filter::apply(&dataset, &selection);
            let kpis = blocks::kpi::compute(&view);
            println!("Total Enrollments: {}", format_count(kpis.total_enrollment));
            println!(
                "Average Enrollment: {}",
                format_number(kpis.mean_enrollment, 0)
            );
            println!("Total States: {}", kpis.state_count);
            println!("Total Districts: {}", kpis.district_count);
            println!("Total Records: {}", format_count(kpis.record_count as u64));
        }
        Commands::Report { args, out } => {
            let dashboard = render(&dataset, &selection, &args.params());
            let report = build_report(&dashboard, chrono::Utc::now());
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Render { args, out } => {
            let dashboard = render(&dataset, &selection, &args.params());
            let json = serde_json::to_string_pretty(&dashboard)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Dashboard written to {}.", path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Export { out } => {
            let view = filter::apply(&dataset, &selection);
            export::write_file(&view, &out)?;
            println!("Exported {} records to {}.", view.len(), out.display());
        }
    }

    Ok(())
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
