pub mod bucket_list;
pub mod plan_list;
