use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chat with Gemini from your terminal", long_about = None)]
pub struct Args {
    /// Ask a single question and exit instead of starting a chat session
    pub query: Option<String>,

    /// Model to use (overrides the config file)
    #[arg(short, long)]
    pub model: Option<String>,

    /// API base URL (overrides the config file)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (0 = wait indefinitely)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Completed turns replayed to the model as context (0 = unlimited)
    #[arg(long)]
    pub context_turns: Option<usize>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
