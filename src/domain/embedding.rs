#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub values: Vec<f32>,
}

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn dimensions(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Scales the vector to unit length. Zero vectors are returned unchanged.
    pub fn normalized(mut self) -> Self {
        let length: f32 = self.values.iter().map(|x| x * x).sum::<f32>().sqrt();
        if length > 0.0 {
            self.values.iter_mut().for_each(|x| *x /= length);
        }
        self
    }
}
