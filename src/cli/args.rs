use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "confnotes")]
#[command(about = "Summarize meeting transcripts into notes", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Run the HTTP API (default when no command is given)
    Serve,
    /// List recent recordings
    List(ListCliArgs),
    /// Summarize a specific recording
    Process(ProcessCliArgs),
    /// Summarize the most recent recording
    Latest(OutputCliArgs),
    /// Show which integrations are configured
    Status,
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct ListCliArgs {
    /// Maximum number of recordings to show (defaults to the configured list_limit)
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(ClapArgs, Debug)]
pub struct ProcessCliArgs {
    /// Recording ID as shown by `confnotes list`
    pub id: String,

    #[command(flatten)]
    pub output: OutputCliArgs,
}

#[derive(ClapArgs, Debug, Default)]
pub struct OutputCliArgs {
    /// Print the full result as JSON instead of markdown
    #[arg(long)]
    pub json: bool,
    /// Copy the summary markdown to the clipboard
    #[arg(short, long)]
    pub copy: bool,
    /// Do not send the summary to the document endpoint
    #[arg(long)]
    pub no_publish: bool,
}
