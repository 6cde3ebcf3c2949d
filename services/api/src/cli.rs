use crate::batch::{
    run_exam_frequency, run_exam_match, run_outreach, FrequencyArgs, MatchArgs, OutreachRunArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use exam_outreach::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Exam Outreach",
    about = "Find pending exams in prescriptions and build patient outreach lists",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Batch outreach over prescription exports
    Outreach {
        #[command(subcommand)]
        command: OutreachCommand,
    },
    /// Inspect exam detection and exam frequency
    Exams {
        #[command(subcommand)]
        command: ExamsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum OutreachCommand {
    /// Match, screen and notify patients, then write the outreach list
    Run(OutreachRunArgs),
}

#[derive(Subcommand, Debug)]
enum ExamsCommand {
    /// Print the exams detected in a piece of prescription text
    Match(MatchArgs),
    /// Count exams in a previously written outreach list
    Frequency(FrequencyArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Outreach {
            command: OutreachCommand::Run(args),
        } => run_outreach(args),
        Command::Exams {
            command: ExamsCommand::Match(args),
        } => run_exam_match(args),
        Command::Exams {
            command: ExamsCommand::Frequency(args),
        } => run_exam_frequency(args),
    }
}
