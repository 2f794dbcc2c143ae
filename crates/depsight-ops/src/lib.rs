pub mod ops_insight;
