pub mod compressor;
pub mod peak_detector;
pub mod projector;
pub mod reducer;
