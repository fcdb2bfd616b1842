//! Command-line front end (SPEC_FULL.md §4.10): exercises the engine
//! against a JSON drawing and a serialized road graph fixture, and
//! writes synthetic grid fixtures standing in for OSM acquisition.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use gpsart::cache::StaticRoadGraphSource;
use gpsart::config::{EngineConfig, NetworkType};
use gpsart::engine::{DrawingRequest, GpsArtEngine};
use gpsart::graph::{build_grid_graph, RoadGraph, SerializedRoadGraph};
use gpsart::projection::WebMercatorProjection;
use gpsart::route::FinalizedRoute;
use gpsart::types::DrawingPoint;
use gpsart::utils::GeoPoint;

/// Generates a road-network route whose trace approximates a freehand
/// drawing ("GPS art"), given a serialized road graph fixture.
#[derive(Parser)]
enum GpsArt {
    /// Synthesize a route from a drawing and a road graph fixture
    Route {
        /// JSON file with an array of `{"x": .., "y": ..}` drawing points
        #[clap(long, parse(from_os_str))]
        drawing: PathBuf,
        #[clap(long)]
        anchor_lat: f64,
        #[clap(long)]
        anchor_lon: f64,
        #[clap(long)]
        target_km: f64,
        /// bincode-serialized `SerializedRoadGraph` fixture (see `synth-grid`)
        #[clap(long, parse(from_os_str))]
        graph: PathBuf,
        #[clap(long, default_value = "1.0")]
        alpha: f64,
        #[clap(long, default_value = "5.0")]
        beta: f64,
        #[clap(long, default_value = "1.0")]
        gamma: f64,
        #[clap(long, default_value = "0.7")]
        path_length_adjustment: f64,
        #[clap(long, default_value = "360")]
        rotation_search_steps: usize,
        #[clap(long, default_value = "40")]
        resample_points: usize,
        #[clap(long, default_value = "200")]
        rotation_search_points: usize,
    },
    /// Write a synthetic square grid road graph fixture to disk, standing
    /// in for the OSM acquisition subsystem for local experimentation
    SynthGrid {
        #[clap(long)]
        anchor_lat: f64,
        #[clap(long)]
        anchor_lon: f64,
        #[clap(long, default_value = "50")]
        spacing_m: f64,
        #[clap(long, default_value = "2000")]
        half_extent_m: f64,
        #[clap(long, parse(from_os_str))]
        output: PathBuf,
    },
}

fn main() {
    match GpsArt::parse() {
        GpsArt::Route {
            drawing,
            anchor_lat,
            anchor_lon,
            target_km,
            graph,
            alpha,
            beta,
            gamma,
            path_length_adjustment,
            rotation_search_steps,
            resample_points,
            rotation_search_points,
        } => run_route(
            drawing,
            anchor_lat,
            anchor_lon,
            target_km,
            graph,
            EngineConfig {
                alpha,
                beta,
                gamma,
                network_type: NetworkType::Walk,
                network_distance: EngineConfig::default().network_distance,
                path_length_adjustment,
                rotation_search_steps,
                resample_points,
                rotation_search_points,
            },
        )
        .unwrap(),
        GpsArt::SynthGrid {
            anchor_lat,
            anchor_lon,
            spacing_m,
            half_extent_m,
            output,
        } => run_synth_grid(anchor_lat, anchor_lon, spacing_m, half_extent_m, output).unwrap(),
    }
}

fn run_route(
    drawing_path: PathBuf,
    anchor_lat: f64,
    anchor_lon: f64,
    target_km: f64,
    graph_path: PathBuf,
    config: EngineConfig,
) -> Result<(), Box<dyn Error>> {
    let drawing_json = fs::read_to_string(drawing_path)?;
    let drawing_display_points: Vec<DrawingPoint> = serde_json::from_str(&drawing_json)?;

    let graph_bytes = fs::read(graph_path)?;
    let serialized: SerializedRoadGraph = bincode::deserialize(&graph_bytes)?;
    let road_graph = RoadGraph::from_serialized(serialized, Box::new(WebMercatorProjection));

    let engine = GpsArtEngine::new(config, Box::new(StaticRoadGraphSource::new(road_graph)));

    let request = DrawingRequest {
        drawing_display_points,
        start_lat: anchor_lat,
        start_lon: anchor_lon,
        target_distance_km: target_km,
    };

    let result = engine.synthesize(&request)?;
    println!("{}", serde_json::to_string_pretty(&EngineOutput::from(result))?);
    Ok(())
}

fn run_synth_grid(
    anchor_lat: f64,
    anchor_lon: f64,
    spacing_m: f64,
    half_extent_m: f64,
    output: PathBuf,
) -> Result<(), Box<dyn Error>> {
    let anchor = GeoPoint::try_from_degrees(anchor_lat, anchor_lon)
        .ok_or("anchor latitude/longitude out of range")?;
    let graph = build_grid_graph(anchor, spacing_m, half_extent_m);
    let bytes = bincode::serialize(&graph.to_serialized())?;
    fs::write(output, bytes)?;
    Ok(())
}

/// The engine's in-process call output (spec §6), rendered to JSON for
/// the CLI: `{lat, lng}` pairs in degrees rather than the internal
/// micro-degree `GeoPoint` representation.
#[derive(Serialize)]
struct EngineOutput {
    total_distance_km: f64,
    route_points: Vec<LatLng>,
    drawing_points: Vec<LatLng>,
}

#[derive(Serialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl From<GeoPoint> for LatLng {
    fn from(point: GeoPoint) -> Self {
        LatLng {
            lat: point.lat.as_degrees(),
            lng: point.lon.as_degrees(),
        }
    }
}

impl From<FinalizedRoute> for EngineOutput {
    fn from(route: FinalizedRoute) -> Self {
        EngineOutput {
            total_distance_km: route.total_distance_km,
            route_points: route.route_points.into_iter().map(LatLng::from).collect(),
            drawing_points: route.drawing_points.into_iter().map(LatLng::from).collect(),
        }
    }
}
