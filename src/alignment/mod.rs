pub(crate) mod edit_distance;
pub mod locale;
pub mod positional;
pub mod report;
pub mod scoring;
pub mod tokenization;
