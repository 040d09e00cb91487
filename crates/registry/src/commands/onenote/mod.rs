pub mod notebook_list;
