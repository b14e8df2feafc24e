use geo::Intersects;
use rstar::{RTree, RTreeObject};

use crate::feature::{GeoJsonFeature, GeoJsonFeatureCollection};
use crate::utils::bbox::{BoundingBox, BoundingBoxWithId, union_all};

/// R-tree over the envelopes of a FeatureCollection.
///
/// Features without an envelope (empty multi-geometries) are never returned.
pub struct FeatureIndex<'a> {
    features: &'a [GeoJsonFeature],
    tree: RTree<BoundingBoxWithId>,
}

impl<'a> FeatureIndex<'a> {
    pub fn new(collection: &'a GeoJsonFeatureCollection) -> Self {
        let features = collection.features();
        let boxes = features
            .iter()
            .enumerate()
            .filter_map(|(i, feature)| feature.bbox().map(|bbox| BoundingBoxWithId(*bbox, i)))
            .collect();
        Self {
            features,
            tree: RTree::bulk_load(boxes),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Envelope of every indexed feature.
    pub fn envelope(&self) -> Option<BoundingBox> {
        union_all(self.tree.iter().map(|BoundingBoxWithId(bbox, _)| bbox))
    }

    /**
     * Features whose shape intersects the window, boundary included.
     *
     * # Arguments
     * `window` - The query rectangle.
     *
     * # Returns
     * Matching features in collection order.
     */
    pub fn query(&self, window: &BoundingBox) -> Vec<&'a GeoJsonFeature> {
        let features = self.features;
        let rect = window.to_geo_rect();
        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&window.envelope())
            .map(|BoundingBoxWithId(_, i)| *i)
            .filter(|i| features[*i].shape().intersects(&rect))
            .collect();
        hits.sort_unstable();
        hits.into_iter().map(|i| &features[i]).collect()
    }
}
