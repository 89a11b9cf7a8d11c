use super::DistanceMetric;

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionConfig {
    pub vector_dimensions: u64,
    pub distance_metric: DistanceMetric,
}

impl CollectionConfig {
    /// Cosine-distance collection sized for the given embedding width.
    pub fn for_dimensions(vector_dimensions: u64) -> Self {
        Self {
            vector_dimensions,
            distance_metric: DistanceMetric::Cosine,
        }
    }
}
