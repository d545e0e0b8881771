use clap::Parser;

#[derive(Parser)]
#[command(name = "rawclean")]
#[command(version)]
#[command(about = "Delete all files in the Adobe CameraRaw Cache2 directory", long_about = None)]
pub struct Cli {
    /// Path to the Cache2 folder (default uses %LOCALAPPDATA%\Adobe\CameraRaw\Cache2)
    #[arg(short, long)]
    pub path: Option<String>,

    /// Skip confirmation prompt and proceed with deletion
    #[arg(short, long)]
    pub yes: bool,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,
}
