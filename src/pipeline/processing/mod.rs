// Pipeline processing: coercion, bucketing and row filtering

pub mod normalize;
