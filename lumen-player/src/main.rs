//! # LUMEN Player
//!
//! Plays a local media file through GStreamer. `uridecodebin` feeds
//! per-type converter chains into the automatic audio and video sinks;
//! this binary resolves the input, builds the graph, and watches the bus
//! until end-of-stream or an error.

use std::path::PathBuf;

use anyhow::Result;

use lumen_core::bus::{self, RunOutcome};
use lumen_core::graph::{GraphOptions, PlaybackGraph};
use lumen_core::uri;

const EXIT_BAD_INPUT: i32 = 1;
const EXIT_SETUP_FAILED: i32 = -1;

// ============================================================================
// Options
// ============================================================================

struct PlayerOptions {
    input: PathBuf,
    volume: f64,
}

impl PlayerOptions {
    fn from_args(args: &[String]) -> Result<Self> {
        let mut input: Option<PathBuf> = None;
        let mut volume: f64 = 1.0;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--volume" | "-v" => {
                    let value = args
                        .get(i + 1)
                        .ok_or_else(|| anyhow::anyhow!("Missing value for --volume"))?;
                    volume = value
                        .parse::<f64>()
                        .map_err(|e| anyhow::anyhow!("Invalid volume {}: {}", value, e))?;
                    i += 2;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other if input.is_none() && !other.starts_with('-') => {
                    input = Some(PathBuf::from(other));
                    i += 1;
                }
                other => {
                    return Err(anyhow::anyhow!("Unexpected argument: {}", other));
                }
            }
        }

        let input = input.ok_or_else(|| anyhow::anyhow!("Missing media file path"))?;

        Ok(Self { input, volume })
    }
}

fn print_usage() {
    eprintln!("\nUsage:\n  lumen <file> [--volume <0.0..=1.0>]\n");
}

// ============================================================================
// Entry Point
// ============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("lumen=info,gstreamer=warn")
        .init();

    // Exit through run() so the graph is dropped, and the pipeline
    // released, on every path.
    std::process::exit(run());
}

fn run() -> i32 {
    let args: Vec<String> = std::env::args().collect();
    let options = match PlayerOptions::from_args(&args) {
        Ok(options) => options,
        Err(err) => {
            tracing::error!("{err}");
            print_usage();
            return EXIT_BAD_INPUT;
        }
    };

    tracing::info!("LUMEN Player v{}", lumen_core::VERSION);

    let uri = match uri::file_uri(&options.input) {
        Ok(uri) => uri,
        Err(err) => {
            tracing::error!("{err}");
            return EXIT_BAD_INPUT;
        }
    };
    tracing::info!("playing {}", uri);

    let graph_options = GraphOptions {
        volume: options.volume,
    };
    let graph = match PlaybackGraph::build(&uri, &graph_options) {
        Ok(graph) => graph,
        Err(err) => {
            tracing::error!("could not assemble the playback graph: {err}");
            return EXIT_SETUP_FAILED;
        }
    };

    let bus = match graph.bus() {
        Ok(bus) => bus,
        Err(err) => {
            tracing::error!("{err}");
            return EXIT_SETUP_FAILED;
        }
    };

    if let Err(err) = graph.play() {
        tracing::error!("could not start playback: {err}");
        return EXIT_SETUP_FAILED;
    }

    match bus::run_to_completion(graph.pipeline(), &bus) {
        RunOutcome::EndOfStream => {}
        RunOutcome::StreamError => {
            tracing::warn!("playback ended after a stream error");
        }
    }

    0
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("lumen")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_path_only() {
        let options = PlayerOptions::from_args(&args(&["clip.mkv"])).unwrap();
        assert_eq!(options.input, PathBuf::from("clip.mkv"));
        assert_eq!(options.volume, 1.0);
    }

    #[test]
    fn test_volume_flag() {
        let options = PlayerOptions::from_args(&args(&["clip.mkv", "--volume", "0.3"])).unwrap();
        assert_eq!(options.volume, 0.3);
    }

    #[test]
    fn test_missing_path_is_rejected() {
        assert!(PlayerOptions::from_args(&args(&[])).is_err());
        assert!(PlayerOptions::from_args(&args(&["--volume", "0.5"])).is_err());
    }

    #[test]
    fn test_bad_volume_is_rejected() {
        assert!(PlayerOptions::from_args(&args(&["clip.mkv", "--volume", "loud"])).is_err());
        assert!(PlayerOptions::from_args(&args(&["clip.mkv", "--volume"])).is_err());
    }

    #[test]
    fn test_second_path_is_rejected() {
        assert!(PlayerOptions::from_args(&args(&["a.mkv", "b.mkv"])).is_err());
    }
}
