use std::path::Path;

use anyhow::{Context, Result};
use geojson::GeoJson;
use railmesh_core::prelude::*;
use tracing::info;

/// Write a GeoJSON feature collection to `output_path`, pretty-printed.
pub fn write_geojson(collection: geojson::FeatureCollection, output_path: &Path) -> Result<()> {
    info!(
        "Writing {} features to {}",
        collection.features.len(),
        output_path.display()
    );

    let geojson = GeoJson::from(collection);
    let json_string = serde_json::to_string_pretty(&geojson)
        .context("Failed to serialize GeoJSON")?;

    std::fs::write(output_path, json_string)
        .with_context(|| format!("Failed to write GeoJSON to {}", output_path.display()))?;

    Ok(())
}

/// Feature count of one display layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerCount {
    pub zoom: ZoomLevel,
    pub class: FeatureClass,
    pub underground: bool,
    /// Map zooms `[min, max)` the layer is shown at.
    pub display_range: (u8, u8),
    pub count: usize,
}

/// Feature counts of every display layer, split by zoom, class and
/// surface/underground.
pub fn layer_summary(features: &FeatureCollection, zoom_levels: &[ZoomLevel]) -> Vec<LayerCount> {
    let mut altitudes: Vec<AltitudeTier> = features.features.iter().map(Feature::altitude).collect();
    altitudes.sort();
    altitudes.dedup();

    let mut summary = Vec::new();
    for &zoom in zoom_levels {
        for class in [FeatureClass::Railway, FeatureClass::Station] {
            for underground in [false, true] {
                let count = altitudes
                    .iter()
                    .filter(|a| a.is_underground() == underground)
                    .map(|a| features.filter(zoom, class, *a).count())
                    .sum();
                summary.push(LayerCount {
                    zoom,
                    class,
                    underground,
                    display_range: zoom.display_range(),
                    count,
                });
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn test_layer_summary_splits_underground() {
        let railway = |id: &str, altitude: i32| RailwayTopology {
            id: RailwayIdentifier::new(id),
            stations: vec![],
            sublines: vec![SublineSpec::Own {
                coordinates: vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 0.0 }],
            }],
            color: "#E85298".into(),
            altitude: AltitudeTier(altitude),
            is_loop: false,
        };
        let network = Network::new(
            vec![railway("a", 0), railway("b", -1), railway("c", -2)],
            vec![],
            vec![],
        )
        .unwrap();

        let zoom = ZoomLevel::ALL[3];
        let output = Pipeline::new(PipelineConfig {
            zoom_levels: vec![zoom],
            ..Default::default()
        })
        .run(&network)
        .unwrap();

        let summary = layer_summary(&output.features, &[zoom]);
        let count = |class, underground| {
            summary
                .iter()
                .find(|layer| layer.class == class && layer.underground == underground)
                .map(|layer| layer.count)
        };

        assert_eq!(summary.len(), 4);
        assert_eq!(count(FeatureClass::Railway, false), Some(1));
        assert_eq!(count(FeatureClass::Railway, true), Some(2));
        assert_eq!(count(FeatureClass::Station, true), Some(0));
        assert!(summary.iter().all(|layer| layer.display_range == (16, 17)));
    }

    #[test]
    fn test_write_geojson() {
        let path = std::env::temp_dir().join("railmesh-output-test.geojson");
        let collection = geojson::FeatureCollection {
            bbox: None,
            features: vec![],
            foreign_members: None,
        };

        write_geojson(collection, &path).unwrap();
        let written: GeoJson = std::fs::read_to_string(&path).unwrap().parse().unwrap();
        assert!(matches!(written, GeoJson::FeatureCollection(fc) if fc.features.is_empty()));
        std::fs::remove_file(path).unwrap();
    }
}
