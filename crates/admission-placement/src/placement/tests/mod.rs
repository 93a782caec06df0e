mod common;
mod thresholds;
