use crate::feature::GeoJsonFeatureCollection;

/// Page through a FeatureCollection.
///
/// Paging applies only when both `offset` and `limit` are given; the second
/// value of the result is always the number of features before paging.
pub fn limit_features(
    collection: GeoJsonFeatureCollection,
    offset: Option<usize>,
    limit: Option<usize>,
) -> (GeoJsonFeatureCollection, usize) {
    let total = collection.len();
    match (offset, limit) {
        (Some(offset), Some(limit)) => {
            let page: GeoJsonFeatureCollection = collection
                .into_features()
                .into_iter()
                .skip(offset)
                .take(limit)
                .collect();
            (page, total)
        }
        _ => (collection, total),
    }
}
