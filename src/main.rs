use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use geoschema::feature::GeoJsonFeatureCollection;
use geoschema::processing::s2_cells::DEFAULT_S2_LEVEL;
use geoschema::processing::text_sequence::load_features;
use geoschema::schema::Schema;
use geoschema::schema::feature::FeatureCollectionSchema;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// validate a FeatureCollection and print its canonical form
    Validate {
        /// GeoJSON file
        file: PathBuf,
    },
    /// validate a GeoJSON text sequence, one feature per line
    Seq {
        /// (e.g. *.geojsons)
        file: PathBuf,
    },
    /// tag Point features with the token of their S2 cell
    S2 {
        /// GeoJSON file
        file: PathBuf,

        /// S2 cell level
        #[arg(default_value_t = DEFAULT_S2_LEVEL)]
        level: u64,
    },
}

fn load_collection(path: &Path) -> Result<GeoJsonFeatureCollection, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let collection = FeatureCollectionSchema.loads(&text)?;
    info!("Loaded {} features from {:?}", collection.len(), path);
    Ok(collection)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Validate { file } => {
            let collection = load_collection(file)?;
            println!("{}", FeatureCollectionSchema.dumps(&collection)?);
        }
        Commands::Seq { file } => {
            let features = load_features(file)?;
            println!("{}: {} valid features", file.display(), features.len());
        }
        Commands::S2 { file, level } => {
            let collection = load_collection(file)?.with_s2_cell_tokens(*level);
            println!("{}", serde_json::to_string(&collection)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_s2_default_level() {
        let cli = Cli::try_parse_from(["geoschema", "s2", "stations.geojson"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::S2 {
                file: PathBuf::from("stations.geojson"),
                level: 30,
            }
        );
        let cli = Cli::try_parse_from(["geoschema", "s2", "stations.geojson", "12"]).unwrap();
        assert!(matches!(cli.command, Commands::S2 { level: 12, .. }));
    }

    #[test]
    fn test_bad_arguments() {
        assert!(Cli::try_parse_from(["geoschema", "s2", "stations.geojson", "abc"]).is_err());
        assert!(Cli::try_parse_from(["geoschema", "validate"]).is_err());
        assert!(Cli::try_parse_from(["geoschema", "convert", "stations.geojson"]).is_err());
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["geoschema", "validate", "a.geojson"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Validate {
                file: PathBuf::from("a.geojson")
            }
        );
        let cli = Cli::try_parse_from(["geoschema", "seq", "a.geojsons"]).unwrap();
        assert!(matches!(cli.command, Commands::Seq { .. }));
    }

    #[test]
    fn test_validate_stations() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/stations.geojson");
        let collection = load_collection(&path).unwrap().with_s2_cell_tokens(DEFAULT_S2_LEVEL);
        assert_eq!(collection.len(), 2);
        assert!(collection.features()[0].property("s2_cell_id").is_some());
    }
}
