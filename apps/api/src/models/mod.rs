pub mod mode;
pub mod notice;

pub use mode::AnalysisMode;
pub use notice::Notice;
