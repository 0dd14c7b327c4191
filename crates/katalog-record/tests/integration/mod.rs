mod concurrent_brands;
mod detail_pipeline;
