use clap::{Parser, Subcommand};
use ffmeta::Tagger;
use ffmeta::metadata::TrackMetadata;
use ffmeta::resolver::ToolConfig;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ffmeta", about = "Edit audio container tags through ffmpeg")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the ffmpeg executable, overriding resolution.
    #[arg(long = "ffmpeg", global = true)]
    pub ffmpeg: Option<PathBuf>,

    #[arg(
        long = "verbosity",
        short,
        global = true,
        default_value = "info",
        value_parser = clap::builder::PossibleValuesParser::new([
            "info", "debug", "error", "none"
        ])
    )]
    pub verbosity: String,
}

#[derive(Subcommand, Clone)]
pub enum Command {
    /// Print the tags of a media file.
    Read {
        file: PathBuf,

        /// Print the tags as JSON instead of key=value lines.
        #[arg(long, action = clap::ArgAction::SetTrue)]
        json: bool,
    },
    /// Update the tags of a media file, keeping fields that are not given.
    Write {
        file: PathBuf,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        artist: Option<String>,

        #[arg(long)]
        year: Option<String>,

        #[arg(long)]
        genre: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Cli::parse();

    let filter = match args.verbosity.as_str() {
        "debug" => "debug",
        "error" => "error",
        "none" => "off",
        _ => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let config = ToolConfig::new(args.ffmpeg, Vec::new());
    let tagger = Tagger::from_config(&config)?;

    match args.command {
        Command::Read { file, json } => {
            let metadata = tagger.read_metadata(&file).await?;
            print!("{}", format_metadata(&metadata, json)?);
        }
        Command::Write {
            file,
            title,
            artist,
            year,
            genre,
        } => {
            let mut metadata = tagger.read_metadata(&file).await?;
            if let Some(title) = title {
                metadata.title = title;
            }
            if let Some(artist) = artist {
                metadata.artist = artist;
            }
            if let Some(year) = year {
                metadata.year = year;
            }
            if let Some(genre) = genre {
                metadata.genre = genre;
            }

            tagger.write_metadata(&metadata, &file).await?;
            info!("Updated {}", file.display());
        }
    }

    Ok(())
}

// Both output modes use the record's own field names, so scripted
// consumers see the same labels with and without --json.
fn format_metadata(
    metadata: &TrackMetadata,
    json: bool,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(metadata)?));
    }

    Ok(format!(
        "title={}\nartist={}\nyear={}\ngenre={}\n",
        metadata.title, metadata.artist, metadata.year, metadata.genre
    ))
}
